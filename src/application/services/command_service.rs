use std::sync::Arc;

use crate::domain::entities::{CommandContext, CommandInvocation, CommandRegistry};
use crate::domain::traits::{CommandResponder, Reply};

/// Shown to the user when a command fails
pub const GENERIC_ERROR: &str = "There was an error while executing this command!";

/// How a dispatched command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Executed,
    NotFound,
    Failed,
}

/// Runs commands from the registry, whatever triggered them
pub struct CommandService {
    registry: Arc<CommandRegistry>,
}

impl CommandService {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub async fn dispatch(
        &self,
        invocation: &CommandInvocation,
        responder: &dyn CommandResponder,
    ) -> DispatchOutcome {
        let Some(command) = self.registry.get(&invocation.name) else {
            tracing::warn!("No command matching {:?} was found.", invocation.name);
            return DispatchOutcome::NotFound;
        };

        tracing::debug!(
            command = %invocation.name,
            trigger = ?invocation.trigger,
            user = %invocation.user,
            "executing command"
        );

        let ctx = CommandContext::new(invocation, &self.registry, responder);
        match command.execute(&ctx).await {
            Ok(()) => DispatchOutcome::Executed,
            Err(e) => {
                tracing::error!("Command {} failed: {}", invocation.name, e);

                // Only one initial response is allowed per invocation
                let reply = Reply::new(GENERIC_ERROR).ephemeral(true);
                let sent = if responder.has_responded() {
                    responder.follow_up(reply).await
                } else {
                    responder.reply(reply).await
                };
                if let Err(e) = sent {
                    tracing::error!("Failed to report command error: {}", e);
                }
                DispatchOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::{BotError, CommandError};
    use crate::domain::entities::{Command, Trigger, User};
    use crate::test_support::LogCapture;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingResponder {
        responded: AtomicBool,
        calls: Mutex<Vec<(&'static str, Reply)>>,
    }

    impl RecordingResponder {
        fn calls(&self) -> Vec<(&'static str, Reply)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandResponder for RecordingResponder {
        async fn reply(&self, reply: Reply) -> Result<(), BotError> {
            self.responded.store(true, Ordering::SeqCst);
            self.calls.lock().unwrap().push(("reply", reply));
            Ok(())
        }

        async fn defer(&self, ephemeral: bool) -> Result<(), BotError> {
            self.responded.store(true, Ordering::SeqCst);
            self.calls.lock().unwrap().push(("defer", Reply::new("").ephemeral(ephemeral)));
            Ok(())
        }

        async fn follow_up(&self, reply: Reply) -> Result<(), BotError> {
            self.calls.lock().unwrap().push(("follow_up", reply));
            Ok(())
        }

        fn has_responded(&self) -> bool {
            self.responded.load(Ordering::SeqCst)
        }
    }

    struct Failing {
        defer_first: bool,
    }

    #[async_trait]
    impl Command for Failing {
        fn name(&self) -> &str {
            if self.defer_first { "slow" } else { "boom" }
        }

        async fn execute(&self, ctx: &CommandContext<'_>) -> Result<(), CommandError> {
            if self.defer_first {
                ctx.defer(false).await?;
            }
            Err(CommandError::ExecutionFailed("kaboom".to_string()))
        }
    }

    struct Echo;

    #[async_trait]
    impl Command for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn execute(&self, ctx: &CommandContext<'_>) -> Result<(), CommandError> {
            ctx.reply(ctx.invocation.args.join(" ")).await
        }
    }

    fn service() -> CommandService {
        let registry = CommandRegistry::builder()
            .with(Arc::new(Failing { defer_first: false }))
            .with(Arc::new(Failing { defer_first: true }))
            .with(Arc::new(Echo))
            .build();
        CommandService::new(Arc::new(registry))
    }

    fn invoke(name: &str) -> CommandInvocation {
        CommandInvocation::new(name, "100", User::new("7"), Trigger::Slash)
    }

    #[tokio::test]
    async fn test_executes_registered_command() {
        let responder = RecordingResponder::default();
        let invocation = invoke("echo").with_args(vec!["a".into(), "b".into()]);

        let outcome = service().dispatch(&invocation, &responder).await;

        assert_eq!(outcome, DispatchOutcome::Executed);
        assert_eq!(responder.calls(), vec![("reply", Reply::new("a b"))]);
    }

    #[tokio::test]
    async fn test_unknown_command_is_logged_and_sends_nothing() {
        let responder = RecordingResponder::default();
        let logs = LogCapture::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());

        let outcome = service().dispatch(&invoke("missing"), &responder).await;

        assert_eq!(outcome, DispatchOutcome::NotFound);
        assert!(responder.calls().is_empty());

        let output = logs.contents();
        let warning = output
            .lines()
            .find(|line| line.contains("No command matching \"missing\" was found."))
            .unwrap_or_else(|| panic!("no not-found warning in {:?}", output));
        assert!(warning.contains("WARN"));
    }

    #[tokio::test]
    async fn test_failure_before_response_replies() {
        let responder = RecordingResponder::default();

        let outcome = service().dispatch(&invoke("boom"), &responder).await;

        assert_eq!(outcome, DispatchOutcome::Failed);
        assert_eq!(
            responder.calls(),
            vec![("reply", Reply::new(GENERIC_ERROR).ephemeral(true))]
        );
    }

    #[tokio::test]
    async fn test_failure_after_defer_follows_up() {
        let responder = RecordingResponder::default();

        let outcome = service().dispatch(&invoke("slow"), &responder).await;

        assert_eq!(outcome, DispatchOutcome::Failed);
        let calls = responder.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "defer");
        assert_eq!(calls[1], ("follow_up", Reply::new(GENERIC_ERROR).ephemeral(true)));
    }
}
