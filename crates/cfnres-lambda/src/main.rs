// AWS Lambda binary entry point for the custom resource backend
//
// Build with: cargo build -p cfnres-lambda --bin bootstrap
//
// The lambda_runtime crate provides the tokio runtime, so we use #[tokio::main]

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    cfnres_lambda::run().await
}
