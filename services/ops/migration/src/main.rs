use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(devsuite_ops_migration::Migrator).await;
}
