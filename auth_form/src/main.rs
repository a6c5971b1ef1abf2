#[tokio::main]
async fn main() -> std::io::Result<()> {
    auth_form::run_with_config().await
}
