use anyhow::{bail, Context, Result};
use turnloom::collect::collect_from_reader;

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let path = args.next();
    if args.next().is_some() {
        bail!("usage: tlreplay [dump-file]");
    }

    let transcript = match path.as_deref() {
        None | Some("-") => collect_from_reader(tokio::io::stdin()).await?,
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open dump file {path}"))?;
            collect_from_reader(file).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&transcript)?);
    Ok(())
}
