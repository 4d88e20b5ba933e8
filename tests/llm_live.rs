//! Live chat-completions tests. Run with: `cargo test --features online -- --nocapture`
#![cfg(feature = "online")]

use talkdata::llm::{ChatClient, DEFAULT_MODEL};
use talkdata::prompts::{TableContext, system_prompt};
use talkdata::{ChatMessage, LanguageModel, extract_sql};

#[test]
fn model_answers_with_one_sql_block() {
    let key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY");
    let client = ChatClient::new(key, DEFAULT_MODEL).unwrap();
    let mut ctx = TableContext::new("DB.PUBLIC.REKLAM", "Reklam rekabet verisi");
    ctx.columns = vec![
        ("MARKA".into(), "TEXT".into()),
        ("AYISMI".into(), "TEXT".into()),
        ("NETTUTAR".into(), "TEXT".into()),
    ];
    let reply = client
        .complete(&[
            ChatMessage::system(system_prompt(&[ctx])),
            ChatMessage::user("Getir'in aylık toplam harcaması"),
        ])
        .unwrap();
    let sql = extract_sql(&reply).expect("fenced SQL block");
    assert!(sql.to_uppercase().contains("MARKA"));
}
