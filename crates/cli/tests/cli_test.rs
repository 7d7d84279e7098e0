use std::path::Path;

use clap::Parser;
use tempfile::tempdir;

use souq_cli::{Args, run};
use souq_model::Listing;

/// Helper: executa `souq --data-dir <dir> <args...>` e devolve o stdout.
fn souq(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
    let data_dir = dir.to_str().unwrap();
    let argv = ["souq", "--data-dir", data_dir]
        .into_iter()
        .chain(args.iter().copied());
    let args = Args::try_parse_from(argv).unwrap();
    let mut out = Vec::new();
    run(args, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn add(dir: &Path, title: &str, price: &str, category: &str) -> Listing {
    let out = souq(
        dir,
        &[
            "--json",
            "add",
            "--title",
            title,
            "--description",
            "anúncio de teste",
            "--price",
            price,
            "--category",
            category,
            "--image",
            "https://img/1.png",
            "--phone",
            "0100",
        ],
    )
    .unwrap();
    let mut listings: Vec<Listing> = serde_json::from_str(&out).unwrap();
    listings.remove(0)
}

#[test]
fn test_list_empty() {
    let dir = tempdir().unwrap();
    let out = souq(dir.path(), &["list"]).unwrap();
    assert_eq!(out, "(nenhum anúncio)\n");
}

#[test]
fn test_add_then_list() {
    let dir = tempdir().unwrap();
    let listing = add(dir.path(), "Sofá", "800", "Furniture");
    assert_eq!(listing.title, "Sofá");
    assert!(dir.path().join("marketplace_products.json").exists());

    let out = souq(dir.path(), &["list"]).unwrap();
    assert!(out.contains("Sofá  800  [Furniture]  new"));
}

#[test]
fn test_add_rejects_invalid_draft() {
    let dir = tempdir().unwrap();
    let err = souq(
        dir.path(),
        &[
            "add",
            "--title",
            "Sem mídia",
            "--description",
            "x",
            "--price",
            "10",
            "--category",
            "Books",
            "--phone",
            "0100",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("ao menos uma imagem"));
    assert!(!dir.path().join("marketplace_products.json").exists());
}

#[test]
fn test_search_by_category_price_desc() {
    let dir = tempdir().unwrap();
    add(dir.path(), "Fone", "50", "Electronics");
    // ids derivam do relógio em ms; evita colisão entre adds seguidos
    std::thread::sleep(std::time::Duration::from_millis(2));
    add(dir.path(), "Monitor", "150", "Electronics");
    std::thread::sleep(std::time::Duration::from_millis(2));
    add(dir.path(), "Romance", "300", "Books");

    let out = souq(
        dir.path(),
        &[
            "--json",
            "search",
            "--category",
            "Electronics",
            "--max-price",
            "1000",
            "--sort",
            "price_desc",
        ],
    )
    .unwrap();
    let found: Vec<Listing> = serde_json::from_str(&out).unwrap();
    let titles: Vec<_> = found.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, ["Monitor", "Fone"]);
}

#[test]
fn test_delete() {
    let dir = tempdir().unwrap();
    let listing = add(dir.path(), "Mesa", "200", "Furniture");

    let out = souq(dir.path(), &["delete", &listing.id]).unwrap();
    assert_eq!(out, format!("removido: {}\n", listing.id));
    assert!(souq(dir.path(), &["delete", &listing.id]).is_err());
    // Coleção vazia: o slot some
    assert!(!dir.path().join("marketplace_products.json").exists());
}

#[test]
fn test_cleanup_drops_expired_from_disk() {
    let dir = tempdir().unwrap();
    let stale = r#"[{"id":"1","title":"Antigo","description":"","price":1,
        "category":"Books","images":[],"createdAt":"2001-01-01T00:00:00.000Z"}]"#;
    std::fs::write(dir.path().join("marketplace_products.json"), stale).unwrap();

    // A carga já remove o expirado; cleanup não encontra mais nada
    let out = souq(dir.path(), &["cleanup"]).unwrap();
    assert_eq!(out, "0 anúncios expirados removidos\n");
    assert!(!dir.path().join("marketplace_products.json").exists());
}

#[test]
fn test_favorites() {
    let dir = tempdir().unwrap();
    let listing = add(dir.path(), "Bicicleta", "900", "Sports");

    souq(dir.path(), &["fav", "add", &listing.id]).unwrap();
    let out = souq(dir.path(), &["fav", "list"]).unwrap();
    assert!(out.contains("Bicicleta"));

    // Favorito sobrevive à remoção do anúncio original
    souq(dir.path(), &["delete", &listing.id]).unwrap();
    let out = souq(dir.path(), &["fav", "list"]).unwrap();
    assert!(out.contains("Bicicleta"));

    souq(dir.path(), &["fav", "remove", &listing.id]).unwrap();
    assert!(!dir.path().join("marketplace_favorites.json").exists());
    assert!(souq(dir.path(), &["fav", "add", "desconhecido"]).is_err());
}
