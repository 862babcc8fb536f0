//! Cosmetic phrases for pin refusals
//!
//! Each category is the Cartesian product of a few phrase halves, joined
//! with a full-width comma, and served through a [`FairRegistry`].

use crate::error::Result;
use crate::fair::FairRegistry;

/// Pin attempted without replying to a message.
pub const PIN_REJECT: &str = "reject";
/// Telegram refused to pin or unpin.
pub const PIN_PERMISSION_DENIED: &str = "permission_denied";
/// Sticker catalog category.
pub const STICKERS: &str = "stickers";

const PERMISSION_DENIED_PARTS: &[(&[&str], &[&str])] = &[
    (
        &["我太菜了", "我好菜", "我好菜啊", "我菜死了"],
        &["pin 不了这条消息", "学不会怎么 pin 这条消息", "连 pin 都不被允许"],
    ),
    (
        &["我学不会怎么 pin 这条消息", "这么简单的消息我都 pin 不了", "好想 pin 这条消息啊，但我做不到"],
        &["需要浇浇", "怎么会有我这么菜的 bot", "我只能混吃等死", "我怎么会菜成这样"],
    ),
    (
        &["这可要我怎么 pin 呀", "怎么才能 pin 这条消息呀", "pin 不动呀，这可怎么办"],
        &["拿大头针钉上吗", "找把锤子敲到柱子上吗", "触及知识盲区了都"],
    ),
];

const REJECT_PARTS: &[(&[&str], &[&str])] = &[(
    &["我累了", "我好懒，又懒又菜", "我的 bot 生只要像这样躺着混日子就已经很幸福了"],
    &["根本不想 pin 这条消息", "才不要 pin 这条消息", "还是另请高明吧", "一点 pin 的动力都没有"],
)];

fn product(parts: &[(&[&str], &[&str])]) -> Vec<String> {
    parts
        .iter()
        .flat_map(|(heads, tails)| {
            heads
                .iter()
                .flat_map(move |head| tails.iter().map(move |tail| format!("{head}，{tail}")))
        })
        .collect()
}

/// All phrases shown when Telegram refuses a pin.
pub fn permission_denied() -> Vec<String> {
    product(PERMISSION_DENIED_PARTS)
}

/// All phrases shown when a pin has no target.
pub fn reject() -> Vec<String> {
    product(REJECT_PARTS)
}

/// Registry holding the phrase categories and the sticker catalog.
pub fn registry(stickers: Vec<String>) -> Result<FairRegistry<String>> {
    Ok(FairRegistry::builder()
        .pool(PIN_PERMISSION_DENIED, permission_denied())?
        .pool(PIN_REJECT, reject())?
        .pool(STICKERS, stickers)?
        .build())
}

/// Reply for a pin command that does not reply to anything.
pub fn pin_rejection(registry: &FairRegistry<String>) -> Result<String> {
    Ok(format!(
        "{} (Reply to a message to use the command)",
        registry.draw(PIN_REJECT)?
    ))
}

/// Reply for a pin Telegram refused, quoting its error.
pub fn pin_apology(registry: &FairRegistry<String>, detail: &str) -> Result<String> {
    Ok(format!("{} ({detail})", registry.draw(PIN_PERMISSION_DENIED)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn products_have_expected_sizes() {
        assert_eq!(permission_denied().len(), 4 * 3 + 3 * 4 + 3 * 3);
        assert_eq!(reject().len(), 3 * 4);
    }

    #[test]
    fn phrases_join_with_fullwidth_comma() {
        assert!(reject().contains(&"我累了，还是另请高明吧".to_string()));
        assert!(permission_denied().iter().all(|p| p.contains('，')));
    }

    #[test]
    fn pin_rejection_mentions_reply_hint() {
        let registry = registry(vec!["sticker".into()]).unwrap();
        let text = pin_rejection(&registry).unwrap();

        assert!(text.ends_with(" (Reply to a message to use the command)"));
        let phrase = text.trim_end_matches(" (Reply to a message to use the command)");
        assert!(reject().contains(&phrase.to_string()));
    }

    #[test]
    fn pin_apology_embeds_detail() {
        let registry = registry(vec!["sticker".into()]).unwrap();
        let text = pin_apology(&registry, "not enough rights").unwrap();
        assert!(text.ends_with(" (not enough rights)"));
    }

    #[test]
    fn registry_requires_stickers() {
        assert!(matches!(registry(vec![]), Err(Error::EmptyPool(c)) if c == STICKERS));
    }
}
