use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use docsearch_core::chunker::ChunkerConfig;
use docsearch_core::config::{expand_path, Config};
use docsearch_core::types::{Answer, ConversationTurn, Role};
use docsearch_engine::{EngineSettings, MergePolicy, SearchEngine};
use docsearch_ollama::{
    default_embedder, GenerationOptions, OllamaClient, OllamaGenerator, DEFAULT_BASE_URL,
};

const PREVIEW_CHARS: usize = 300;

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {prog} <index|ask|chat> [args...]");
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn build_engine(config: &Config) -> Result<SearchEngine> {
    let index_dir =
        expand_path(config.get_or::<String>("data.index_dir", "./data/index".to_string()));
    let base_url = config.get_or::<String>("ollama.base_url", DEFAULT_BASE_URL.to_string());
    let embed_model = config.get_or::<String>("ollama.embed_model", "bge-m3".to_string());
    let chat_model = config.get_or::<String>("ollama.chat_model", "qwen2.5:3b".to_string());
    let dim = config.get_or::<usize>("ollama.embedding_dim", 1024);

    let settings = EngineSettings {
        index_dir,
        top_k: config.get_or::<usize>("search.top_k", 5),
        merge_policy: MergePolicy {
            primary_quota: config.get_or::<usize>("search.primary_quota", 3),
            secondary_quota: config.get_or::<usize>("search.secondary_quota", 3),
        },
        chunker: ChunkerConfig {
            chunk_size: config.get_or::<usize>("chunking.chunk_size", 2000),
            overlap: config.get_or::<usize>("chunking.overlap", 300),
        },
    };

    let embedder = default_embedder(OllamaClient::new(&base_url)?, &embed_model, dim);
    let generator = OllamaGenerator::new(
        OllamaClient::new(&base_url)?,
        chat_model,
        GenerationOptions::default(),
    );
    Ok(SearchEngine::new(settings, embedder, Arc::new(generator)))
}

fn doc_roots(config: &Config, args: &[String]) -> Vec<PathBuf> {
    if args.is_empty() {
        let dir = config.get_or::<String>("data.doc_dir", "./doc".to_string());
        vec![expand_path(dir)]
    } else {
        args.iter().map(expand_path).collect()
    }
}

fn print_answer(answer: &Answer) {
    println!("\n{}", answer.text);
    if answer.passages.is_empty() {
        return;
    }
    println!("\n참고 문서 및 인용 내용");
    for (i, passage) in answer.passages.iter().enumerate() {
        let content = &passage.chunk.content;
        let total_chars = content.chars().count();
        let preview: String = if total_chars > PREVIEW_CHARS {
            content.chars().take(PREVIEW_CHARS).collect::<String>() + "..."
        } else {
            content.clone()
        };
        println!("\n[{}] {}", i + 1, passage.chunk.source_id);
        println!("{preview}");
        println!("(전체 길이: {total_chars} 글자)");
    }
}

async fn run_index(engine: &SearchEngine, roots: &[PathBuf]) -> Result<()> {
    for root in roots {
        println!("인덱싱 대상: {}", root.display());
    }
    let report = engine.build_index(roots).await?;
    println!(
        "✅ 인덱싱 완료: 문서 {}개, 청크 {}개",
        report.document_count, report.chunk_count
    );
    Ok(())
}

async fn run_chat(engine: &SearchEngine, config: &Config, args: &[String]) -> Result<()> {
    let mut history: Vec<ConversationTurn> = Vec::new();
    println!("사내 규정 검색기 (종료: /quit, 재인덱싱: /reindex)");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match input {
            "/quit" | "/exit" => break,
            "/reindex" => {
                let roots = doc_roots(config, args);
                if let Err(e) = run_index(engine, &roots).await {
                    eprintln!("인덱싱 실패: {e:#}");
                }
            }
            question => {
                history.push(ConversationTurn {
                    role: Role::User,
                    text: question.to_string(),
                });
                match engine.ask(question).await {
                    Ok(answer) => {
                        print_answer(&answer);
                        history.push(ConversationTurn {
                            role: Role::Assistant,
                            text: answer.text,
                        });
                    }
                    Err(e) => eprintln!("오류 발생: {e:#}"),
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let config = Config::load()?;
    let (cmd, args) = parse_args();
    let engine = build_engine(&config)?;

    match cmd.as_str() {
        "index" => {
            let roots = doc_roots(&config, &args);
            run_index(&engine, &roots).await?;
        }
        "ask" => {
            let Some(question) = args.first() else {
                eprintln!("Usage: docsearch ask \"<question>\"");
                std::process::exit(1);
            };
            let answer = engine.ask(question).await?;
            print_answer(&answer);
        }
        "chat" => {
            run_chat(&engine, &config, &args).await?;
        }
        _ => {
            eprintln!("Unknown command: {cmd}");
            std::process::exit(1);
        }
    }
    Ok(())
}
