pub mod health;
pub mod metrics;

/// GET /hello - Sample endpoint
pub async fn hello() -> &'static str {
    "Hello, world!"
}
