use crate::services::{CorpListingLoader, EmbeddingClient, SearchClient};

pub async fn run(embeddings: bool) {
    println!("📥 Loading corporate listing into the search index\n");

    match load(embeddings).await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Load failed: {}", e);
            std::process::exit(1);
        }
    }
}

async fn load(embeddings: bool) -> Result<(), Box<dyn std::error::Error>> {
    let loader = CorpListingLoader::new()?;
    let mut companies = loader.fetch_companies().await?;
    println!("✅ Downloaded {} listed companies", companies.len());

    if embeddings {
        println!("🧮 Computing text embeddings (this takes a while)...");
        let embedder = EmbeddingClient::new()?;
        let embedded = loader.embed_companies(&mut companies, &embedder).await?;
        println!("✅ Embedded {}/{} companies", embedded, companies.len());
    } else {
        println!("⏭️  Skipping embeddings (pass --embeddings to enable semantic search)");
    }

    let index = SearchClient::new()?;
    index.recreate_index().await?;

    let documents: Vec<serde_json::Value> = companies
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()?;

    let accepted = index.bulk_index(&documents).await?;
    println!("✅ Indexed {} documents", accepted);

    Ok(())
}
