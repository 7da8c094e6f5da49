/// Creates a single [`ChatMessage`](crate::ChatMessage) from a role shorthand.
///
/// ```rust
/// use wisdombridge::{Role, wb_msg};
///
/// let message = wb_msg!(assistant => "What do you build?");
/// assert_eq!(message.role, Role::Assistant);
/// assert_eq!(message.content, "What do you build?");
/// ```
#[macro_export]
macro_rules! wb_msg {
    (user => $content:expr $(,)?) => {
        $crate::ChatMessage::new($crate::Role::User, $content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::ChatMessage::new($crate::Role::Assistant, $content)
    };
    ($role:ident => $content:expr $(,)?) => {
        compile_error!("unsupported role: use user or assistant");
    };
}

/// Creates a `Vec<ChatMessage>` from role/content pairs.
///
/// ```rust
/// use wisdombridge::{Role, wb_messages};
///
/// let messages = wb_messages![
///     assistant => "What do you build?",
///     user => "Timber frames.",
/// ];
///
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[0].role, Role::Assistant);
/// assert_eq!(messages[1].role, Role::User);
/// ```
#[macro_export]
macro_rules! wb_messages {
    () => {
        Vec::<$crate::ChatMessage>::new()
    };
    ($($role:ident => $content:expr),+ $(,)?) => {
        vec![$($crate::wb_msg!($role => $content)),+]
    };
}

/// Creates a [`SessionContext`](crate::SessionContext) from a topic and optional area.
///
/// ```rust
/// use wisdombridge::{ExpertiseArea, wb_context};
///
/// let context = wb_context!("Timber framing", ExpertiseArea::Engineering);
/// assert_eq!(context.topic.as_deref(), Some("Timber framing"));
/// assert_eq!(context.expertise_area, Some(ExpertiseArea::Engineering));
/// ```
#[macro_export]
macro_rules! wb_context {
    () => {
        $crate::SessionContext::new()
    };
    ($topic:expr $(,)?) => {
        $crate::SessionContext::new().with_topic($topic)
    };
    ($topic:expr, $area:expr $(,)?) => {
        $crate::SessionContext::new()
            .with_topic($topic)
            .with_expertise_area($area)
    };
}
