//! Telegram transport
//!
//! Dispatches incoming Telegram messages to the [`Processor`] and sends the
//! rendered replies back.

use crate::processor::{Processor, Reply};
use std::sync::Arc;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ReplyParameters};
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info, warn};

/// Telegram refuses messages longer than this many characters
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

type HandlerResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Команды бота:")]
pub enum Command {
    #[command(description = "начать работу")]
    Start,
    #[command(description = "как пользоваться ботом")]
    Help,
}

/// Run the bot until Ctrl+C
pub async fn run(bot: Bot, processor: Processor) -> anyhow::Result<()> {
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("⚠️ Could not register bot commands: {}", e);
    }

    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(dptree::filter(|msg: Message| msg.photo().is_some()).endpoint(handle_photo))
        .branch(dptree::filter(|msg: Message| msg.text().is_some()).endpoint(handle_text))
        .branch(dptree::endpoint(handle_other));

    info!("🚀 Bot is polling for updates (Ctrl+C to stop)");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![Arc::new(processor)])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("👋 Bot stopped");
    Ok(())
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command) -> HandlerResult {
    debug!("Command {:?} from chat {}", cmd, msg.chat.id);
    send_reply(&bot, &msg, &Reply::Welcome).await
}

async fn handle_text(bot: Bot, msg: Message, processor: Arc<Processor>) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    info!("📝 Text message from chat {} ({} chars)", msg.chat.id, text.chars().count());

    send_typing(&bot, &msg).await;
    let reply = processor.correct_typed_text(text).await;
    send_reply(&bot, &msg, &reply).await
}

async fn handle_photo(bot: Bot, msg: Message, processor: Arc<Processor>) -> HandlerResult {
    info!("📸 Photo from chat {}", msg.chat.id);
    send_typing(&bot, &msg).await;

    let reply = match download_largest_photo(&bot, &msg).await {
        Ok(image) => processor.correct_image(&image).await,
        Err(e) => {
            error!("❌ Failed to download photo: {}", e);
            Reply::ProcessingError
        }
    };

    send_reply(&bot, &msg, &reply).await
}

async fn handle_other(bot: Bot, msg: Message) -> HandlerResult {
    debug!("Unsupported message from chat {}", msg.chat.id);
    send_reply(&bot, &msg, &Reply::Unsupported).await
}

/// Telegram lists photo sizes smallest first
async fn download_largest_photo(bot: &Bot, msg: &Message) -> HandlerResult<Vec<u8>> {
    let photo = msg
        .photo()
        .and_then(|sizes| sizes.last())
        .ok_or("message has no photo")?;

    let file = bot.get_file(photo.file.id.clone()).await?;
    let mut image = Vec::with_capacity(file.size as usize);
    bot.download_file(&file.path, &mut image).await?;

    debug!("Downloaded {} bytes from {}", image.len(), file.path);
    Ok(image)
}

async fn send_typing(bot: &Bot, msg: &Message) {
    if let Err(e) = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await {
        debug!("Could not send typing action: {}", e);
    }
}

async fn send_reply(bot: &Bot, msg: &Message, reply: &Reply) -> HandlerResult {
    for part in split_message(&reply.render(), TELEGRAM_MESSAGE_LIMIT) {
        bot.send_message(msg.chat.id, part)
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
    }
    Ok(())
}

/// Split `text` into chunks of at most `limit` chars.
///
/// A chunk ends at the last newline inside the window when there is one.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let chars: Vec<char> = text.chars().collect();
    let mut parts = Vec::new();
    let mut start = 0;

    while chars.len() - start > limit {
        let window = &chars[start..start + limit];
        let cut = match window.iter().rposition(|&c| c == '\n') {
            Some(pos) if pos > 0 => pos + 1,
            _ => limit,
        };
        parts.push(chars[start..start + cut].iter().collect());
        start += cut;
    }

    if start < chars.len() || parts.is_empty() {
        parts.push(chars[start..].iter().collect());
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_is_single_part() {
        assert_eq!(split_message("привет", 4096), vec!["привет"]);
    }

    #[test]
    fn test_split_on_char_boundaries() {
        let text = "я".repeat(10);
        let parts = split_message(&text, 4);
        assert_eq!(parts, vec!["яяяя", "яяяя", "яя"]);
    }

    #[test]
    fn test_split_prefers_newline() {
        let parts = split_message("ab\ncdef", 5);
        assert_eq!(parts, vec!["ab\n", "cdef"]);
    }

    #[test]
    fn test_parts_rejoin_to_original() {
        let text = "строка\n".repeat(50);
        let parts = split_message(&text, 30);
        assert!(parts.iter().all(|p| p.chars().count() <= 30));
        assert_eq!(parts.concat(), text);
    }

    #[test]
    fn test_commands_parse() {
        assert_eq!(Command::parse("/start", "proofbot").ok(), Some(Command::Start));
        assert_eq!(Command::parse("/help", "proofbot").ok(), Some(Command::Help));
        assert!(Command::parse("/other", "proofbot").is_err());
    }
}
