use clap::Parser;
use duelforge::prelude::*;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "card-war")]
#[command(about = "Two-player card war server: higher card wins the round")]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "DUEL_BIND", default_value = "0.0.0.0:3000")]
    bind: String,

    /// Characters in a generated room code (4 to 32)
    #[arg(
        long,
        env = "DUEL_CODE_LENGTH",
        default_value_t = 6,
        value_parser = clap::value_parser!(u16).range(4..=32)
    )]
    code_length: u16,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log: String,
}

impl Cli {
    fn room_config(&self) -> RoomConfig {
        RoomConfig {
            code_length: usize::from(self.code_length),
        }
    }
}

// ---------------------------------------------------------------------------
// Server bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    let server = DuelServer::builder()
        .bind(&cli.bind)
        .room_config(cli.room_config())
        .build()
        .await?;
    tracing::info!(addr = %server.local_addr()?, "card war server ready");

    server.run().await?;
    Ok(())
}
