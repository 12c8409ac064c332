use std::net::SocketAddr;

use tokio::net::TcpListener;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut bind_addr: SocketAddr = "127.0.0.1:0".parse()?;
    let mut body_path = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bind" => {
                let addr = args.next().ok_or_else(|| {
                    anyhow::anyhow!("--bind requires an address, e.g. 127.0.0.1:9567")
                })?;
                bind_addr = addr.parse()?;
            }
            "--body" => {
                body_path = Some(
                    args.next()
                        .ok_or_else(|| anyhow::anyhow!("--body requires a file path"))?,
                );
            }
            "-h" | "--help" => {
                eprintln!(
                    "mdbench-testserver\n\nUSAGE:\n  mdbench-testserver [--bind 127.0.0.1:0] [--body FILE]\n\nOUTPUT:\n  Prints METRICS_ADDR=<host:port> to stdout once ready."
                );
                return Ok(());
            }
            other => {
                return Err(anyhow::anyhow!("unknown argument: {other}"));
            }
        }
    }

    let body = match body_path {
        Some(path) => tokio::fs::read_to_string(&path).await?,
        None => mdbench_testserver::SAMPLE_METRICS.to_string(),
    };

    let listener = TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    let app = mdbench_testserver::router(body, mdbench_testserver::MetricsServerStats::default());

    println!("METRICS_ADDR={addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
