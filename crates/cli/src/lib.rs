#![forbid(unsafe_code)]

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use souq_common::{DEFAULT_DATA_DIR, MAX_SAFE_PRICE};
use souq_model::{Condition, FilterQuery, Listing, ListingDraft, MissingField};
use souq_storage::{FavoritesStore, FileStorage, ProductStore};

/// Filtro de log quando `RUST_LOG` não está definido.
pub const DEFAULT_LOG_FILTER: &str = "souq=info,souq_cli=info,souq_storage=info";

#[derive(Parser, Debug)]
#[command(name = "souq", about = "Souq: anúncios classificados locais")]
pub struct Args {
    /// Diretório dos slots de armazenamento
    #[arg(long, value_name = "DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
    /// Imprime os anúncios como JSON
    #[arg(long)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lista todos os anúncios ativos
    List,
    /// Publica um anúncio
    Add(AddArgs),
    /// Filtra e ordena os anúncios
    Search(SearchArgs),
    /// Remove um anúncio pelo id
    Delete { id: String },
    /// Remove anúncios com mais de 30 dias
    Cleanup,
    /// Gerencia favoritos
    Fav {
        #[command(subcommand)]
        action: FavCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum FavCommand {
    Add { id: String },
    Remove { id: String },
    List,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub price: f64,
    #[arg(long)]
    pub category: String,
    #[arg(long = "image", value_name = "URL")]
    pub images: Vec<String>,
    #[arg(long = "video", value_name = "URL")]
    pub videos: Vec<String>,
    #[arg(long = "audio", value_name = "URL")]
    pub audios: Vec<String>,
    #[arg(long, value_parser = parse_condition)]
    pub condition: Option<Condition>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub seller_type: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    #[arg(long, short, default_value = "")]
    pub query: String,
    /// Vazio aceita qualquer categoria
    #[arg(long, default_value = "")]
    pub category: String,
    #[arg(long, default_value_t = 0.0)]
    pub min_price: f64,
    #[arg(long, default_value_t = MAX_SAFE_PRICE)]
    pub max_price: f64,
    /// price_asc, price_desc, newest ou default
    #[arg(long, default_value = "default")]
    pub sort: String,
    #[arg(long, default_value = "all")]
    pub condition: String,
    #[arg(long, default_value = "all")]
    pub location: String,
    #[arg(long, default_value = "all")]
    pub seller_type: String,
    /// Anúncios sem o campo filtrado não passam no filtro
    #[arg(long)]
    pub strict: bool,
}

impl SearchArgs {
    pub fn to_query(&self) -> FilterQuery {
        let missing = if self.strict {
            MissingField::Exclude
        } else {
            MissingField::Match
        };
        FilterQuery::new()
            .search(self.query.as_str())
            .category(&self.category)
            .price_range(self.min_price, self.max_price)
            .sort(self.sort.as_str())
            .condition(&self.condition)
            .location(&self.location)
            .seller_type(&self.seller_type)
            .missing_field(missing)
    }
}

impl From<AddArgs> for ListingDraft {
    fn from(a: AddArgs) -> Self {
        ListingDraft {
            title: a.title,
            description: a.description,
            price: Some(a.price),
            category: a.category,
            images: a.images,
            videos: a.videos,
            audios: a.audios,
            condition: a.condition,
            location: a.location,
            seller_type: a.seller_type,
            phone: a.phone,
            email: a.email,
            ..Default::default()
        }
    }
}

fn parse_condition(s: &str) -> Result<Condition, String> {
    Condition::parse(s).ok_or_else(|| {
        format!("valor inválido: '{s}'. Use: new, like-new, good, used, damaged")
    })
}

/// Executa um comando, escrevendo o resultado em `out`.
pub fn run<W: Write>(args: Args, out: &mut W) -> anyhow::Result<()> {
    let storage = FileStorage::open(&args.data_dir)
        .with_context(|| format!("abrindo {:?}", args.data_dir))?;
    let mut products = ProductStore::open(storage.clone());

    match args.command {
        Command::List => {
            print_listings(out, products.get_all(), args.json)?;
        }
        Command::Add(add) => {
            let listing = products.publish(ListingDraft::from(add))?;
            info!("anúncio publicado: {}", listing.id);
            print_listings(out, std::slice::from_ref(listing), args.json)?;
        }
        Command::Search(search) => {
            let found = products.filter(&search.to_query());
            print_listings(out, &found, args.json)?;
        }
        Command::Delete { id } => {
            if !products.delete(&id) {
                bail!("anúncio não encontrado: {id}");
            }
            writeln!(out, "removido: {id}")?;
        }
        Command::Cleanup => {
            let removed = products.cleanup();
            writeln!(out, "{removed} anúncios expirados removidos")?;
        }
        Command::Fav { action } => {
            let mut favorites = FavoritesStore::open(storage);
            match action {
                FavCommand::Add { id } => {
                    let Some(listing) = products.get_all().iter().find(|l| l.id == id).cloned()
                    else {
                        bail!("anúncio não encontrado: {id}");
                    };
                    if !favorites.add(listing) {
                        warn!("{id} já está nos favoritos");
                    }
                    writeln!(out, "favorito: {id}")?;
                }
                FavCommand::Remove { id } => {
                    if !favorites.remove(&id) {
                        bail!("{id} não está nos favoritos");
                    }
                    writeln!(out, "removido dos favoritos: {id}")?;
                }
                FavCommand::List => {
                    print_listings(out, favorites.list(), args.json)?;
                }
            }
            if let Some(e) = favorites.last_write_error() {
                bail!("favoritos não gravados: {e}");
            }
        }
    }

    if let Some(e) = products.last_write_error() {
        bail!("alterações não gravadas: {e}");
    }
    Ok(())
}

fn print_listings<W: Write>(out: &mut W, listings: &[Listing], json: bool) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(listings)?)?;
        return Ok(());
    }
    if listings.is_empty() {
        writeln!(out, "(nenhum anúncio)")?;
    }
    for listing in listings {
        writeln!(out, "{}", format_listing(listing))?;
    }
    Ok(())
}

/// Uma linha por anúncio: id, título, preço, categoria e os campos opcionais
/// presentes.
pub fn format_listing(listing: &Listing) -> String {
    let mut line = format!(
        "{}  {}  {}  [{}]",
        listing.id,
        listing.title,
        format_price(listing.price),
        listing.category
    );
    if let Some(c) = &listing.condition {
        line.push_str("  ");
        line.push_str(c.as_str());
    }
    if let Some(loc) = &listing.location {
        line.push_str("  @");
        line.push_str(loc);
    }
    line
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.0}")
    } else {
        format!("{price:.2}")
    }
}
