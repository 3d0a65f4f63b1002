use petclinic_records::cli;

#[tokio::main]
async fn main() -> petclinic_records::Result<()> {
    cli::main().await
}
