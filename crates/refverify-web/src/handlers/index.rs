/// Health check.
pub async fn index() -> &'static str {
    "Reference Verifier is running!"
}
