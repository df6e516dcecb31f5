use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use ed25519_dalek::SigningKey;
use oracle_chain::{build_transaction, Chain, GenesisConfig};
use oracle_crypto::signatures::{generate_keypair, principal_of};
use oracle_storage::{FileStore, StateStore};
use oracle_types::block::Block;
use oracle_types::instruction::OracleInstruction;
use oracle_types::principal::Principal;
use oracle_types::record::PriceRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Price oracle devnet CLI: register reporters, publish and read prices"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, default_value = "./oracle-data")]
    data_dir: PathBuf,
    #[arg(short, long, default_value = "wallet.json")]
    wallet_path: PathBuf,
    #[arg(long, default_value = "info")]
    log_level: Level,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new wallet
    Init,
    /// Show current wallet info
    Show,
    /// Write the genesis state, optionally pre-registering oracles
    Genesis {
        #[arg(long = "oracle")]
        oracles: Vec<String>,
    },
    /// Register the wallet key as an oracle
    Register,
    /// Publish a price for a symbol
    UpdatePrice {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        price: u128,
        #[arg(long)]
        decimals: u32,
        #[arg(long)]
        source: String,
    },
    /// Read the latest price for a symbol
    GetPrice {
        #[arg(long)]
        symbol: String,
    },
    /// List registered oracles
    Oracles,
    /// Get block info
    Block {
        #[arg(long)]
        height: u64,
    },
    /// Chain height and tracked symbols
    Status,
}

#[derive(Serialize, Deserialize)]
struct Wallet {
    secret_key: String,
    public_key: String,
}

impl Wallet {
    fn generate() -> Self {
        let kp = generate_keypair();
        Self {
            secret_key: hex::encode(kp.to_bytes()),
            public_key: hex::encode(kp.verifying_key().as_bytes()),
        }
    }

    fn load(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("No wallet at {:?}; run `init` first", path))?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, path: &PathBuf) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn to_keypair(&self) -> Result<SigningKey> {
        let secret = hex::decode(&self.secret_key)?;
        let bytes: [u8; 32] = secret
            .as_slice()
            .try_into()
            .map_err(|_| anyhow!("Wallet secret key must be 32 bytes"))?;
        Ok(SigningKey::from_bytes(&bytes))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Init => {
            if cli.wallet_path.exists() {
                bail!("Wallet already exists at {:?}", cli.wallet_path);
            }
            let wallet = Wallet::generate();
            wallet.save(&cli.wallet_path)?;
            println!("Wallet initialized at {:?}", cli.wallet_path);
            println!("Principal: {}", wallet.public_key);
        }
        Commands::Show => {
            let wallet = Wallet::load(&cli.wallet_path)?;
            let principal = principal_of(&wallet.to_keypair()?);
            println!("Wallet: {:?}", cli.wallet_path);
            println!("Principal: {}", principal);
            if let Some(state) = open_store(cli)?.load_state()? {
                let chain = Chain::from_snapshot(state);
                println!("Registered oracle: {}", chain.is_registered(&principal));
                println!("Next nonce: {}", chain.nonce(&principal));
            }
        }
        Commands::Genesis { oracles } => {
            let store = open_store(cli)?;
            if store.load_state()?.is_some() {
                bail!("Chain state already exists in {:?}", cli.data_dir);
            }
            let oracles = oracles
                .iter()
                .map(|s| s.parse::<Principal>().map_err(|e| anyhow!("Bad principal {}: {}", s, e)))
                .collect::<Result<Vec<_>>>()?;
            let chain = Chain::new(&GenesisConfig { oracles });
            store.save_state(&chain.snapshot())?;
            info!("Genesis written to {:?}", cli.data_dir);
            println!("Genesis created with {} oracles", chain.service().state().registry.len());
        }
        Commands::Register => {
            submit(cli, OracleInstruction::RegisterOracle)?;
        }
        Commands::UpdatePrice {
            symbol,
            price,
            decimals,
            source,
        } => {
            submit(
                cli,
                OracleInstruction::UpdatePrice {
                    symbol: symbol.clone(),
                    price: *price,
                    decimals: *decimals,
                    source: source.clone(),
                },
            )?;
        }
        Commands::GetPrice { symbol } => {
            let chain = load_chain(cli)?;
            match chain.get_price(symbol) {
                Some(record) => print_record(record),
                None => println!("none"),
            }
        }
        Commands::Oracles => {
            let chain = load_chain(cli)?;
            for reg in chain.service().state().registry.iter() {
                println!("{} (since height {})", reg.principal, reg.registered_at);
            }
        }
        Commands::Block { height } => match open_store(cli)?.load_block_by_height(*height)? {
            Some(block) => print_block(&block),
            None => println!("Block not found"),
        },
        Commands::Status => {
            let chain = load_chain(cli)?;
            let prices = &chain.service().state().prices;
            println!("Height: {}", chain.height());
            println!("Tip: {}", hex::encode(chain.tip_hash()));
            println!("Oracles: {}", chain.service().state().registry.len());
            println!("Symbols: {}", prices.symbols().collect::<Vec<_>>().join(", "));
        }
    }

    Ok(())
}

fn open_store(cli: &Cli) -> Result<FileStore> {
    FileStore::new(&cli.data_dir).context("Failed to initialize storage")
}

fn load_chain(cli: &Cli) -> Result<Chain> {
    Chain::load_or_genesis(&open_store(cli)?, &GenesisConfig::default())
}

/// Signs `instruction` with the wallet key, mines it as a one-transaction
/// block and persists the result.
fn submit(cli: &Cli, instruction: OracleInstruction) -> Result<()> {
    let key = Wallet::load(&cli.wallet_path)?.to_keypair()?;
    let store = open_store(cli)?;
    let mut chain = Chain::load_or_genesis(&store, &GenesisConfig::default())?;

    let nonce = chain.nonce(&principal_of(&key));
    let name = instruction.name();
    let tx = build_transaction(&key, nonce, instruction)?;
    let block = chain.mine_block(vec![tx]);
    chain.commit(&store, &block)?;

    for receipt in &block.receipts {
        println!("{} at height {}: {}", name, block.header.height, receipt.outcome);
    }
    Ok(())
}

fn print_record(record: &PriceRecord) {
    println!("symbol:     {}", record.symbol);
    println!("price:      {}", record.price);
    println!("decimals:   {}", record.decimals);
    println!("source:     {}", record.source);
    println!("updated-at: {}", record.updated_at);
    println!("updated-by: {}", record.updated_by);
}

fn print_block(block: &Block) {
    println!("Height: {}", block.header.height);
    println!("Hash: {}", hex::encode(block.hash()));
    println!("Prev: {}", hex::encode(block.header.prev_hash));
    println!("State root: {}", hex::encode(block.header.state_root));
    for (tx, receipt) in block.transactions.iter().zip(&block.receipts) {
        println!(
            "  {} {} nonce={} -> {}",
            hex::encode(receipt.tx_id),
            tx.instruction.name(),
            tx.nonce,
            receipt.outcome
        );
    }
}
