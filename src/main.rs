use haulcost::config::{Config, REQUIRED_VARIABLES};
use haulcost::engine::Engine;
use haulcost::server::serve;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run().await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), haulcost::error::Error> {
    let config = Config::from_env().map_err(|err| {
        tracing::error!(
            "check all required environment variables ({}) are set",
            REQUIRED_VARIABLES.join(", ")
        );
        err
    })?;

    config.log();

    let engine = Engine::from_config(&config);

    serve(engine, config.listen_addr).await
}
