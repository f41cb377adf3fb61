use std::{process, sync::Arc};

use channelcast::{
    application::error::AppError,
    application::syndication::{SiteLinks, SyndicationService},
    cache::FeedCacheStore,
    config,
    domain::channel::ChannelId,
    domain::types::FeedFormat,
    infra::{
        channels::FileChannelsRepo,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
};
use tokio::sync::Notify;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Render(args) => run_render(settings, args).await,
        config::Command::DropCache(args) => run_drop_cache(settings, args),
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let syndication = build_syndication(&settings, settings.cache.enabled)?;
    let router = http::build_router(HttpState {
        syndication: Arc::new(syndication),
    });

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "channelcast::serve",
        addr = %settings.server.addr,
        channels = %settings.channels.directory.display(),
        cache_enabled = settings.cache.enabled,
        "Listening for feed requests"
    );

    let shutdown = Arc::new(Notify::new());
    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown({
        let shutdown = Arc::clone(&shutdown);
        async move { shutdown.notified().await }
    });
    let server = server.into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(|err| AppError::from(InfraError::from(err)))?;
            info!(
                target = "channelcast::serve",
                grace_secs = settings.server.graceful_shutdown.as_secs(),
                "Shutdown requested; draining connections"
            );
            shutdown.notify_one();
            match tokio::time::timeout(settings.server.graceful_shutdown, &mut server).await {
                Ok(result) => {
                    result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?
                }
                Err(_) => warn!(
                    target = "channelcast::serve",
                    "Graceful shutdown timed out; dropping open connections"
                ),
            }
        }
    }

    Ok(())
}

async fn run_render(settings: config::Settings, args: config::RenderArgs) -> Result<(), AppError> {
    let syndication = build_syndication(&settings, settings.cache.enabled)?;
    let rendered = syndication.feed(&args.segment).await?;

    info!(
        target = "channelcast::render",
        segment = %args.segment,
        format = %rendered.format,
        source = ?rendered.source,
        bytes = rendered.body.len(),
        "Feed rendered"
    );
    print!("{}", rendered.body);
    Ok(())
}

fn run_drop_cache(settings: config::Settings, args: config::DropCacheArgs) -> Result<(), AppError> {
    let format = args
        .format
        .as_deref()
        .map(str::parse::<FeedFormat>)
        .transpose()
        .map_err(AppError::validation)?;
    let syndication = build_syndication(&settings, true)?;

    let removed = match args.channel.as_deref() {
        Some(raw) => {
            let channel = ChannelId::parse(raw)?;
            syndication.drop_cache(&channel, format)?
        }
        None if format.is_some() => {
            return Err(AppError::validation(
                "--format requires a channel; omit both to clear the whole cache",
            ));
        }
        None => syndication.clear_cache()?,
    };

    info!(
        target = "channelcast::drop_cache",
        channel = args.channel.as_deref().unwrap_or("*"),
        removed = removed,
        "Feed cache entries removed"
    );
    Ok(())
}

fn build_syndication(
    settings: &config::Settings,
    with_cache: bool,
) -> Result<SyndicationService, AppError> {
    let channels = Arc::new(FileChannelsRepo::new(settings.channels.directory.clone()));
    let cache = if with_cache {
        let store = FeedCacheStore::new(settings.cache.directory.clone())
            .map_err(|err| AppError::from(InfraError::configuration(err.to_string())))?;
        Some(Arc::new(store))
    } else {
        None
    };
    let site = SiteLinks {
        home_url: settings.site.home_url.clone(),
        public_url: settings.site.public_url.clone(),
    };

    Ok(SyndicationService::new(channels, cache, site))
}
