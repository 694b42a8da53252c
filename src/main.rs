// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PROFILE ENRICHMENT CLI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// CLI para enriquecer um perfil público.
//
// Uso:
//   profile-enrichment-cli "Ada Lovelace"
//   profile-enrichment-cli "Ada Lovelace" --company "Analytical Engines" --spouse "William King"
//   profile-enrichment-cli "Ada Lovelace" --key customer-42 --repeat
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use profile_enrichment::prelude::*;
use profile_enrichment::utils::normalize_key;
use std::path::PathBuf;
use std::sync::Arc;

/// Tenta carregar o arquivo .env de múltiplos locais possíveis
fn load_dotenv() {
    let possible_paths = [
        PathBuf::from(".env"),
        PathBuf::from("../.env"),
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(".env"),
    ];

    for path in &possible_paths {
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => {
                    eprintln!(
                        "✓ Carregado .env de: {:?}",
                        path.canonicalize().unwrap_or(path.clone())
                    );
                    return;
                }
                Err(e) => {
                    eprintln!("⚠ Erro ao carregar {:?}: {}", path, e);
                }
            }
        }
    }

    eprintln!("⚠ Nenhum arquivo .env encontrado. Certifique-se de que SERP_API_KEY está definida.");
}

/// Argumentos da linha de comando
#[derive(Debug, Default)]
struct CliArgs {
    name: String,
    company: Option<String>,
    spouse: Option<String>,
    key: Option<String>,
    repeat: bool,
}

/// Parse manual dos argumentos; flags podem aparecer em qualquer posição
fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut name_parts = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--company" => parsed.company = Some(flag_value(&mut iter, "--company")?),
            "--spouse" => parsed.spouse = Some(flag_value(&mut iter, "--spouse")?),
            "--key" => parsed.key = Some(flag_value(&mut iter, "--key")?),
            "--repeat" => parsed.repeat = true,
            other if other.starts_with("--") => anyhow::bail!("opção desconhecida: {}", other),
            other => name_parts.push(other.to_string()),
        }
    }

    parsed.name = name_parts.join(" ");
    if parsed.name.trim().is_empty() {
        anyhow::bail!("nome do sujeito é obrigatório");
    }
    Ok(parsed)
}

fn flag_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> anyhow::Result<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("{} requer um valor", flag))
}

fn print_usage(program: &str) {
    eprintln!("Profile Enrichment CLI v{}", profile_enrichment::VERSION);
    eprintln!();
    eprintln!("Uso: {} <nome> [opções]", program);
    eprintln!();
    eprintln!("Opções:");
    eprintln!("  --company <empresa>  Empresa atual do sujeito");
    eprintln!("  --spouse <nome>      Cônjuge (entra na query social)");
    eprintln!("  --key <chave>        Chave de cache (padrão: nome normalizado)");
    eprintln!("  --repeat             Executa duas vezes para exercitar o cache");
    eprintln!();
    eprintln!("Exemplos:");
    eprintln!("  {} \"Ada Lovelace\"", program);
    eprintln!("  {} \"Ada Lovelace\" --company \"Analytical Engines\" --repeat", program);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("profile-enrichment-cli");

    let cli = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("✗ {}", e);
            eprintln!();
            print_usage(program);
            std::process::exit(1);
        }
    };

    let mut subject = SubjectDescriptor::new(cli.name.trim());
    if let Some(company) = &cli.company {
        subject = subject.with_company(company, "Unknown");
    }
    if let Some(spouse) = &cli.spouse {
        subject = subject.with_spouse(spouse);
    }
    let cache_key = cli.key.clone().unwrap_or_else(|| normalize_key(&cli.name));

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(" PROFILE ENRICHMENT v{}", profile_enrichment::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("Sujeito: {}", subject.name);
    println!("Chave:   {}", cache_key);
    println!();

    let config = load_enrichment_config();
    let collector = MetricsCollector::new();
    let enricher = ProfileEnricher::from_config(config, Arc::new(collector.clone())).await?;

    let runs = if cli.repeat { 2 } else { 1 };
    let mut profile = None;
    for run in 1..=runs {
        let (result, report) = enricher.enrich_with_report(&subject, &cache_key).await?;
        println!(
            "▶ Execução {}: {} em {}ms ({} provedores, {} degradados)",
            run,
            if report.cache_hit { "cache hit" } else { "cache miss" },
            report.latency_ms,
            report.providers_attempted.len(),
            report.providers_degraded.len()
        );
        profile = Some(result);
    }
    println!();

    if let Some(profile) = profile {
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!(" PERFIL");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!();
        println!("{}", serde_json::to_string_pretty(&profile)?);
        println!();
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(" ESTATÍSTICAS");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("{}", collector.summary());
    println!("{}", enricher.cache().summary());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_with_flags() {
        let cli = parse_args(&args(&["Ada", "--company", "Engines", "Lovelace", "--repeat"])).unwrap();
        assert_eq!(cli.name, "Ada Lovelace");
        assert_eq!(cli.company.as_deref(), Some("Engines"));
        assert!(cli.repeat);
        assert!(cli.key.is_none());
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["Ada", "--key"])).is_err());
        assert!(parse_args(&args(&["Ada", "--verbose"])).is_err());
    }
}
