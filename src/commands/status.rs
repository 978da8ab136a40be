use crate::services::SearchClient;

pub async fn run() {
    println!("📊 Search Index Status\n");

    match show_status().await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn show_status() -> Result<(), Box<dyn std::error::Error>> {
    let index = SearchClient::new()?;

    match index.ping().await {
        Ok(()) => println!("✅ Search engine reachable"),
        Err(e) => {
            println!("⚠️  Search engine unreachable: {}", e);
            return Ok(());
        }
    }

    match index.doc_count().await {
        Ok(0) => println!("⚠️  Index is empty. Run 'load' first."),
        Ok(count) => println!("📈 Indexed companies: {}", count),
        Err(e) => println!("⚠️  Could not read document count: {}", e),
    }

    Ok(())
}
