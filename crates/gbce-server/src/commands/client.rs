use gbce_server::{build_request, ExchangeClient};

use crate::cli::ClientArgs;
use crate::error::CliError;

pub async fn run(args: ClientArgs) -> Result<(), CliError> {
    let request = build_request(&args.action, &args.params)?;
    let mut client = ExchangeClient::connect((args.host.as_str(), args.port)).await?;

    let Some(response) = client.send(&request).await? else {
        println!("{}: sent", request.action);
        return Ok(());
    };

    if !response.is_success() {
        return Err(CliError::Rejected {
            action: response.action,
            message: response.args.message,
        });
    }

    println!(
        "{}: {}",
        response.action,
        response.value().unwrap_or("None")
    );
    Ok(())
}
