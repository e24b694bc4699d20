use anyhow::Result;
use busyblock_core::remote::RemoteProvider;

pub async fn run(provider_name: &str) -> Result<()> {
    let provider = RemoteProvider::from_name(provider_name);

    println!("Authenticating with {}...", provider_name);

    // Provider handles the full auth flow and stores credentials/tokens
    let account = provider.authenticate().await?;

    println!("\nAuthenticated as: {}", account);
    println!("\nReference this account from [source] or [destination] in config.toml:");
    println!();
    println!("provider = \"{}\"", provider_name);
    println!("{}_account = \"{}\"", provider_name, account);
    println!("calendar_id = \"primary\"");
    println!();
    println!("Then run `busyblock sync`.");

    Ok(())
}
