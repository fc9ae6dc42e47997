use mock_server::{FileStatus, Namenode};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{
    filter::LevelFilter, prelude::__tracing_subscriber_SubscriberExt as _,
    util::SubscriberInitExt as _, EnvFilter,
};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "50070".to_string());
    let addr = format!("127.0.0.1:{port}");

    let mut namenode = Namenode::new().with_file("/", FileStatus::directory("hdfs"));
    if let (Ok(user), Ok(password)) = (
        std::env::var("MOCK_NAMENODE_USER"),
        std::env::var("MOCK_NAMENODE_PASSWORD"),
    ) {
        info!(user = %user, "basic authentication enabled");
        namenode = namenode.with_credentials(&user, &password);
    }

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "mock namenode listening");
    mock_server::run(listener, namenode).await
}
