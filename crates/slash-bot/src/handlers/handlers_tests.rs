#[cfg(test)]
mod tests {
    use slash_core::grammar::parse_sentence;
    use slash_core::mocks::MockProfileLookup;
    use slash_core::{CommandNormalizer, ReplyContext, SenderIdentity};

    use crate::handlers::*;

    fn alice() -> SenderIdentity {
        SenderIdentity {
            id: 1,
            name: "Alice".to_string(),
            handle: Some("alice".to_string()),
        }
    }

    async fn reply(text: &str, reply: Option<&ReplyContext>, lookup: &MockProfileLookup) -> Option<String> {
        let parsed = parse_sentence(text).unwrap();
        render_reply(&CommandNormalizer::new("slashbot"), lookup, &alice(), reply, &parsed)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_reply_starts_with_direction_mark() {
        let lookup = MockProfileLookup::new();
        let text = reply("/me is happy", None, &lookup).await.unwrap();

        assert_eq!(
            text,
            "\u{200e}<a href=\"tg://user?id=1\">Alice</a> is happy!"
        );
        assert!(text.starts_with(LEFT_TO_RIGHT_MARK));
    }

    #[tokio::test]
    async fn test_reply_targets_replied_sender() {
        let lookup = MockProfileLookup::new();
        let bob = ReplyContext {
            sender: SenderIdentity {
                id: 2,
                name: "Bob".to_string(),
                handle: None,
            },
            is_topic_created_notice: false,
        };

        let text = reply("/pat", Some(&bob), &lookup).await.unwrap();

        assert_eq!(
            text,
            "\u{200e}<a href=\"tg://user?id=1\">Alice</a> pat 了 <a href=\"tg://user?id=2\">Bob</a>!"
        );
    }

    #[tokio::test]
    async fn test_nameless_reply_sender_is_skipped() {
        let lookup = MockProfileLookup::new();
        let ghost = ReplyContext {
            sender: SenderIdentity {
                id: 3,
                name: String::new(),
                handle: None,
            },
            is_topic_created_notice: false,
        };

        assert_eq!(reply("/pat", Some(&ghost), &lookup).await, None);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_an_error() {
        let lookup = MockProfileLookup::new().with_failure("carol_x");
        let parsed = parse_sentence("/hug @carol_x").unwrap();

        let result = render_reply(&CommandNormalizer::new("slashbot"), &lookup, &alice(), None, &parsed).await;

        assert!(result.is_err());
    }
}
