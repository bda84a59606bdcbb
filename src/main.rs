use std::sync::Arc;

use switchboard::callback::CachedCallback;
use switchboard::config::Config;
use switchboard::handler::FileCallback;
use switchboard::http::ContentType;
use switchboard::{logger, server, Dispatcher, StaticCallback};

const DEFAULT_HOMEPAGE: &str = r"<!DOCTYPE html>
<html>
<head><title>Switchboard</title></head>
<body>
<h1>Switchboard</h1>
<p>The dispatch server is running. Register callbacks or mount a
directory in config.toml to serve something more useful.</p>
</body>
</html>";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;
    let dispatcher = build_dispatcher(&cfg);

    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(server::AppState {
        config: cfg,
        dispatcher,
    });
    server::run(listener, state).await
}

/// Assemble the dispatch chain from the routes configuration
fn build_dispatcher(cfg: &Config) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();
    dispatcher.set_server_name(&cfg.http.server_name);

    for mount in &cfg.routes.mounts {
        let files = FileCallback::new(&mount.prefix, &mount.dir)
            .with_index_files(cfg.routes.index_files.clone());
        if mount.cached {
            dispatcher.register(
                CachedCallback::new(files).with_caching_interval(mount.client_cache_seconds),
            );
        } else {
            dispatcher.register(files);
        }
    }

    if cfg.routes.default_homepage {
        dispatcher.register(StaticCallback::new(DEFAULT_HOMEPAGE, ContentType::Html));
    }

    dispatcher
}
