#[tokio::main]
async fn main() {
    barbershop_backend::run().await;
}
