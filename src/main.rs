use sage::chat::{ChatSession, TurnOutcome};
use sage::cli::{output::Output, Cli, Commands};
use sage::db::VectorStore;
use sage::eval;
use sage::llm::Provider;
use sage::rag::embeddings::create_embedder;
use sage::rag::{IngestPipeline, Retriever, TextChunker};
use sage::types::{AppError, Result};
use sage::utils::config::SageConfig;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // .env first so api_key_env lookups see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    let out = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    if let Err(e) = run(cli, &out).await {
        out.error(&e.to_string());
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli, out: &Output) -> Result<()> {
    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Init { path, force } => sage::cli::init::run(&path, force, out),

        Commands::Config { validate } => {
            let config = SageConfig::load(&cli.config)?;
            if validate {
                out.success(&format!("{} is valid", cli.config.display()));
                return Ok(());
            }
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| AppError::Internal(e.to_string()))?;
            println!("{}", rendered);
            Ok(())
        }

        Commands::Ingest { path } => {
            let config = SageConfig::load_or_default(&cli.config)?;
            let store = open_store(&config).await?;
            let embedder = create_embedder(&config.rag.embedding_model)?;
            let chunker = TextChunker::new(config.rag.chunk_size, config.rag.chunk_overlap)?;
            let pipeline =
                IngestPipeline::new(store, embedder, chunker, config.rag.collection.as_str());

            let report = pipeline.run(&path).await?;
            out.success(&format!(
                "Indexed {} chunks from {} documents into '{}'",
                report.chunks, report.documents, report.collection
            ));
            Ok(())
        }

        Commands::Ask { question } => {
            let config = SageConfig::load_or_default(&cli.config)?;
            let mut session = build_session(&config).await?;

            match session.handle_turn(&question).await {
                TurnOutcome::Delivered { answer, .. } => {
                    out.answer(&answer);
                    Ok(())
                }
                TurnOutcome::Rejected { reason, .. } => {
                    out.warning(&reason);
                    Ok(())
                }
                TurnOutcome::Failed { error } => Err(AppError::LLM(error)),
            }
        }

        Commands::Chat => {
            let config = SageConfig::load_or_default(&cli.config)?;
            let session = build_session(&config).await?;
            chat_loop(session, &config, out).await
        }

        Commands::Eval { questions, output } => {
            let config = SageConfig::load_or_default(&cli.config)?;
            let store = open_store(&config).await?;
            let embedder = create_embedder(&config.rag.embedding_model)?;
            let retriever = Retriever::new(store, embedder, config.rag.collection.as_str());
            let llm = Provider::from_config(&config.llm)?.create_client().await?;

            let cases = match questions {
                Some(path) => eval::load_cases(path)?,
                None => eval::builtin_cases(),
            };

            let report = eval::run_eval(&retriever, llm.as_ref(), &cases, config.assistant.top_k)
                .await?;
            for record in &report.cases {
                out.info(&format!(
                    "context {:.2} | answer {:.2} | {}",
                    record.context_recall, record.answer_recall, record.question
                ));
            }
            out.info(&format!(
                "mean context recall {:.2}, mean answer recall {:.2}",
                report.mean_context_recall, report.mean_answer_recall
            ));

            eval::write_report(&report, &output)?;
            out.success(&format!("Report saved to {}", output.display()));
            Ok(())
        }
    }
}

async fn open_store(config: &SageConfig) -> Result<Arc<dyn VectorStore>> {
    let store = config.vector_store_provider().create_store().await?;
    Ok(Arc::from(store))
}

async fn build_session(config: &SageConfig) -> Result<ChatSession> {
    let store = open_store(config).await?;
    let embedder = create_embedder(&config.rag.embedding_model)?;
    let retriever = Retriever::new(store, embedder, config.rag.collection.as_str());
    let llm = Provider::from_config(&config.llm)?.create_client().await?;

    Ok(ChatSession::new(
        config.guardrails.clone(),
        retriever,
        llm,
        config.assistant.top_k,
    ))
}

async fn chat_loop(mut session: ChatSession, config: &SageConfig, out: &Output) -> Result<()> {
    out.banner();
    out.answer(&config.assistant.greeting);
    out.info("Type /clear to reset the conversation, /quit to exit.");

    let stdin = std::io::stdin();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match input {
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear();
                out.info("Conversation cleared.");
                continue;
            }
            _ => {}
        }

        match session.handle_turn(input).await {
            TurnOutcome::Delivered { answer, .. } => out.answer(&answer),
            TurnOutcome::Rejected { reason, .. } => out.warning(&reason),
            TurnOutcome::Failed { error } => {
                out.error(&format!("Error generating response: {}", error))
            }
        }
    }

    out.info("Goodbye.");
    Ok(())
}
