// Hello-world Lambda function
//
// Build with: cargo build -p cfnres-lambda --bin hello-world

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    cfnres_lambda::hello::run().await
}
