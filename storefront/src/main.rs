// storefront/src/main.rs

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use storefront::credentials::{CredentialProvider, StaticToken, StoredToken, TokenStore};
use storefront::models::{LoginForm, NewOrder, Registration};
use storefront::{
  AuthClient, CartBindings, CartClient, ClientConfig, ClientState, FileTokenStore, HttpTransport, OrderBindings,
  OrdersClient, TerminalSurface,
};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Debug, Parser)]
#[command(name = "storefront", version, about = "Storefront cart, order and account client")]
struct Cli {
  /// Overrides STOREFRONT_BASE_URL.
  #[arg(long, global = true)]
  base_url: Option<String>,

  /// Bearer token for cart requests instead of the stored one.
  #[arg(long, global = true, env = "STOREFRONT_TOKEN", hide_env_values = true)]
  token: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  #[command(subcommand)]
  Cart(CartCommand),
  #[command(subcommand)]
  Orders(OrdersCommand),
  Login {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
  },
  Register(RegisterArgs),
  /// Forgets stored tokens.
  Logout,
}

#[derive(Debug, Subcommand)]
enum CartCommand {
  Show,
  Add {
    slug: String,
    #[arg(long, short, default_value_t = 1)]
    quantity: u32,
  },
  /// Sets the quantity of an item already in the cart.
  Set { slug: String, quantity: String },
  Remove { slug: String },
  Clear,
  Checkout,
}

#[derive(Debug, Subcommand)]
enum OrdersCommand {
  List,
  Show { id: i64 },
  /// Creates an order from `slug=quantity` pairs.
  Create {
    #[arg(required = true, value_parser = parse_order_line)]
    items: Vec<(String, u32)>,
  },
  Cancel { id: i64 },
  Delete { id: i64 },
}

#[derive(Debug, Args)]
struct RegisterArgs {
  #[arg(long)]
  email: String,
  #[arg(long)]
  password: String,
  #[arg(long)]
  phone: String,
  #[arg(long)]
  first_name: String,
  #[arg(long)]
  last_name: String,
}

fn parse_order_line(raw: &str) -> Result<(String, u32), String> {
  let (slug, quantity) = raw
    .split_once('=')
    .ok_or_else(|| format!("expected slug=quantity, got '{}'", raw))?;
  let quantity = quantity
    .parse::<u32>()
    .map_err(|e| format!("bad quantity in '{}': {}", raw, e))?;
  Ok((slug.to_string(), quantity))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::WARN)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let mut config = ClientConfig::from_env().context("loading configuration")?;
  if let Some(base_url) = cli.base_url {
    config.base_url = base_url.trim_end_matches('/').to_string();
  }

  let token_store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.token_file.clone()));
  let credentials: Arc<dyn CredentialProvider> = match cli.token {
    Some(token) => Arc::new(StaticToken::new(token)),
    None => Arc::new(StoredToken::new(token_store.clone(), config.cart_token_key.clone())),
  };
  let transport = Arc::new(HttpTransport::new(&config)?);
  let state = ClientState::new(config, transport, credentials, token_store, Arc::new(TerminalSurface::new()));

  // Failures were already alerted by the component; the error only sets the exit code.
  match cli.command {
    Command::Cart(cmd) => {
      let cart = CartClient::new(state, CartBindings::default());
      match cmd {
        CartCommand::Show => cart.fetch_cart().await.map(drop)?,
        CartCommand::Add { slug, quantity } => cart.add_item(&slug, quantity).await.map(drop)?,
        CartCommand::Set { slug, quantity } => cart.change_quantity(&slug, &quantity).await.map(drop)?,
        CartCommand::Remove { slug } => cart.remove_item(&slug).await.map(drop)?,
        CartCommand::Clear => cart.clear_cart().await.map(drop)?,
        CartCommand::Checkout => cart.checkout().await.map(drop)?,
      }
    }
    Command::Orders(cmd) => {
      let orders = OrdersClient::new(state, OrderBindings::default());
      match cmd {
        OrdersCommand::List => orders.list_orders().await.map(drop)?,
        OrdersCommand::Show { id } => orders.get_order(id).await.map(drop)?,
        OrdersCommand::Create { items } => {
          let new_order = items
            .into_iter()
            .fold(NewOrder::default(), |order, (slug, quantity)| order.with_item(slug, quantity));
          orders.create_order(new_order).await.map(drop)?
        }
        OrdersCommand::Cancel { id } => orders.cancel_order(id).await.map(drop)?,
        OrdersCommand::Delete { id } => orders.delete_order(id).await.map(drop)?,
      }
    }
    Command::Login { email, password } => {
      AuthClient::new(state).login(LoginForm { email, password }).await.map(drop)?
    }
    Command::Register(args) => {
      let registration = Registration {
        email: args.email,
        password: args.password,
        phone_number: args.phone,
        first_name: args.first_name,
        last_name: args.last_name,
      };
      AuthClient::new(state).register(registration).await.map(drop)?
    }
    Command::Logout => {
      AuthClient::new(state).logout()?;
      eprintln!("Logged out.");
    }
  }

  Ok(())
}
