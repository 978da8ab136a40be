use krx_explorer::cli;

#[tokio::main]
async fn main() {
    cli::run().await;
}
