use anyhow::Result;
use guestsync_core::provider::Provider;

pub async fn run(provider_name: &str) -> Result<()> {
    let provider = Provider::from_name(provider_name);

    println!("Authenticating with {provider_name}...");

    // Provider handles the full OAuth flow and stores credentials/tokens
    let account = provider.authenticate().await?;

    println!("Authenticated as: {account}\n");
    println!("Use it in a pair with:\n");
    println!("  [[pairs]]");
    println!("  source = \"{account}\"");
    println!("  guest = \"<guest identity>\"");
    if provider_name != guestsync_core::constants::DEFAULT_PROVIDER {
        println!("  provider = \"{provider_name}\"");
    }

    Ok(())
}
