use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match hikejo::start_server().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("hikejo-server: {e}");
            ExitCode::FAILURE
        }
    }
}
