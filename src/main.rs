use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

mod assets;
mod config;
mod forms;
mod http;
mod logger;
mod server;

use server::ServiceKind;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let site_addr = cfg.site_socket_addr()?;
    let form_addr = cfg.form_socket_addr()?;

    let site_listener = server::create_reusable_listener(site_addr)?;
    let form_listener = server::create_reusable_listener(form_addr)?;

    let store = match cfg.store.backend {
        config::StoreBackend::File => forms::store::FileStore::shared(&cfg.store.data_file),
        config::StoreBackend::Memory => forms::store::MemoryStore::shared(),
    };
    let state = Arc::new(config::AppState::new(&cfg, store));

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    logger::log_startup(&site_addr, &form_addr, &cfg);

    // Both services run on one LocalSet: the site server in a spawned
    // task, the form server in the main task, until a shutdown signal.
    let local = tokio::task::LocalSet::new();
    local
        .run_until(run_dual_servers(site_listener, form_listener, state, signals))
        .await;

    Ok(())
}

async fn run_dual_servers(
    site_listener: tokio::net::TcpListener,
    form_listener: tokio::net::TcpListener,
    state: Arc<config::AppState>,
    signals: Arc<server::SignalHandler>,
) {
    let site_connections = Arc::new(AtomicUsize::new(0));
    let form_connections = Arc::new(AtomicUsize::new(0));

    let site_state = Arc::clone(&state);
    tokio::task::spawn_local(async move {
        server::run_accept_loop(site_listener, site_state, site_connections, ServiceKind::Site)
            .await;
    });

    tokio::select! {
        () = server::run_accept_loop(form_listener, state, form_connections, ServiceKind::Form) => {}
        () = signals.shutdown.notified() => {
            logger::log_shutdown();
        }
    }
}
