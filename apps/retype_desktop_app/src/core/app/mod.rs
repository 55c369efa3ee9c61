mod settings;

use crate::{
    core::{
        error::{AppError, InputError, SystemError},
        system::permissions,
    },
    dialogs::{InputPrompt, PromptRequest},
};
use retype_keys::{KeyError, KeyInjector, RepeatJob, Repeater};
pub use settings::Settings;
use std::time::Duration;

const LINE_MESSAGE: &str = "Enter the line:";
const COUNT_MESSAGE: &str = "Enter the number of times to be repeated:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { repetitions: u32 },
    Cancelled,
}

type Sleeper = Box<dyn FnMut(Duration)>;
type AccessibilityCheck = Box<dyn Fn() -> Result<(), SystemError>>;
type Connector<I> = Box<dyn FnOnce() -> Result<I, KeyError>>;

/// Prompts for a line and a count, waits for the user to refocus the target
/// window, then retypes the line.
///
/// The keyboard is only connected once both prompts succeeded and
/// accessibility trust is confirmed; on macOS connecting without trust fails.
pub struct App<P: InputPrompt, I: KeyInjector> {
    settings: Settings,
    prompt: P,
    connect: Option<Connector<I>>,
    injector: Option<I>,
    sleeper: Sleeper,
    accessibility: AccessibilityCheck,
}

impl<P: InputPrompt, I: KeyInjector> App<P, I> {
    pub fn new(
        settings: Settings,
        prompt: P,
        connect: impl FnOnce() -> Result<I, KeyError> + 'static,
    ) -> Self {
        Self {
            settings,
            prompt,
            connect: Some(Box::new(connect)),
            injector: None,
            sleeper: Box::new(std::thread::sleep),
            accessibility: Box::new(permissions::ensure_accessibility),
        }
    }

    pub fn with_countdown(mut self, countdown: Duration) -> Self {
        self.settings.countdown_secs = countdown.as_secs_f64();
        self
    }

    pub fn with_repeat_delay(mut self, delay: Duration) -> Self {
        self.settings.repeat_delay_secs = delay.as_secs_f64();
        self
    }

    pub fn with_sleeper(mut self, sleeper: impl FnMut(Duration) + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub fn with_accessibility_check(
        mut self,
        check: impl Fn() -> Result<(), SystemError> + 'static,
    ) -> Self {
        self.accessibility = Box::new(check);
        self
    }

    pub fn run(&mut self) -> Result<RunOutcome, AppError> {
        self.settings.validate()?;
        let title = self.settings.title.clone();

        let Some(line) = self.prompt.prompt(&PromptRequest::new(&title, LINE_MESSAGE))? else {
            log::info!("Line prompt cancelled");
            return Ok(RunOutcome::Cancelled);
        };

        let Some(times) = self.prompt_count(&title)? else {
            log::info!("Count prompt cancelled");
            return Ok(RunOutcome::Cancelled);
        };

        (self.accessibility)()?;
        self.connect_injector()?;

        let confirmed = self.prompt.acknowledge(
            &title,
            &format!(
                "The line will be repeated {} times. Please switch to the target application \
                 and click on the text box to start the process in {} Seconds.",
                times, self.settings.countdown_secs
            ),
        )?;
        if !confirmed {
            log::info!("Start dismissed before the countdown");
            return Ok(RunOutcome::Cancelled);
        }

        self.countdown(self.settings.countdown());

        let job = RepeatJob::new(line, times)
            .with_inter_delay(self.settings.repeat_delay())
            .with_keystroke_interval(self.settings.keystroke_interval())
            .with_submit_key(self.settings.submit_key);
        let injector = self.connect_injector()?;
        let repetitions = Repeater::new(injector).repeat(&job)?;

        Ok(RunOutcome::Completed { repetitions })
    }

    fn connect_injector(&mut self) -> Result<&mut I, KeyError> {
        let injector = match self.injector.take() {
            Some(injector) => injector,
            None => {
                let connect = self
                    .connect
                    .take()
                    .ok_or_else(|| KeyError::Init("keyboard connection already failed".into()))?;
                connect()?
            }
        };
        Ok(self.injector.insert(injector))
    }

    /// Re-prompts until the value parses as a non-negative integer, the user
    /// cancels, or `max_count_attempts` is exhausted.
    fn prompt_count(&mut self, title: &str) -> Result<Option<u32>, AppError> {
        let request = PromptRequest::new(title, COUNT_MESSAGE);
        let max_attempts = self.settings.max_count_attempts.max(1);

        let mut attempt = 0;
        loop {
            attempt += 1;
            let Some(raw) = self.prompt.prompt(&request)? else {
                return Ok(None);
            };

            if let Some(times) = parse_count(&raw) {
                return Ok(Some(times));
            }

            if attempt >= max_attempts {
                return Err(InputError::InvalidCount {
                    value: raw,
                    attempts: attempt,
                }
                .into());
            }

            log::warn!("Rejected repeat count '{}' (attempt {})", raw, attempt);
            self.prompt.notify_error(
                title,
                &format!(
                    "'{}' is not a valid number of repetitions. Enter a whole number such as 3.",
                    raw
                ),
            )?;
        }
    }

    fn countdown(&mut self, total: Duration) {
        let whole = total.as_secs();
        let fraction = total - Duration::from_secs(whole);
        if !fraction.is_zero() {
            (self.sleeper)(fraction);
        }

        for remaining in (1..=whole).rev() {
            log::info!("Starting in {}...", remaining);
            (self.sleeper)(Duration::from_secs(1));
        }
    }
}

fn parse_count(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{ConfigError, PromptError};
    use retype_keys::{
        recording::{KeyAction, RecordingInjector},
        SubmitKey,
    };
    use std::{
        cell::{Cell, RefCell},
        collections::VecDeque,
        rc::Rc,
    };

    type TestApp = App<ScriptedPrompt, RecordingInjector>;

    #[derive(Default)]
    struct ScriptedPrompt {
        responses: VecDeque<Option<String>>,
        requests: Vec<PromptRequest>,
        acknowledged: Vec<String>,
        errors: Vec<String>,
        decline_start: bool,
    }

    impl ScriptedPrompt {
        fn new(responses: &[Option<&str>]) -> Self {
            Self {
                responses: responses.iter().map(|r| r.map(String::from)).collect(),
                ..Self::default()
            }
        }
    }

    impl InputPrompt for ScriptedPrompt {
        fn prompt(&mut self, request: &PromptRequest) -> Result<Option<String>, PromptError> {
            self.requests.push(request.clone());
            self.responses
                .pop_front()
                .ok_or_else(|| PromptError::Terminal("no scripted response".to_string()))
        }

        fn acknowledge(&mut self, _title: &str, message: &str) -> Result<bool, PromptError> {
            self.acknowledged.push(message.to_string());
            Ok(!self.decline_start)
        }

        fn notify_error(&mut self, _title: &str, message: &str) -> Result<(), PromptError> {
            self.errors.push(message.to_string());
            Ok(())
        }
    }

    fn app_with(prompt: ScriptedPrompt) -> (TestApp, Rc<RefCell<Vec<Duration>>>) {
        let slept = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::clone(&slept);
        let app = App::new(Settings::default(), prompt, || Ok(RecordingInjector::default()))
            .with_sleeper(move |d| recorder.borrow_mut().push(d))
            .with_accessibility_check(|| Ok(()));
        (app, slept)
    }

    fn app(responses: &[Option<&str>]) -> (TestApp, Rc<RefCell<Vec<Duration>>>) {
        app_with(ScriptedPrompt::new(responses))
    }

    fn typed(app: &TestApp) -> &RecordingInjector {
        app.injector.as_ref().expect("keyboard should be connected")
    }

    #[test]
    fn hello_three_times_with_shift_enter() {
        let (mut app, _) = app(&[Some("hello"), Some("3")]);

        let outcome = app.run().unwrap();
        assert_eq!(outcome, RunOutcome::Completed { repetitions: 3 });

        let injector = typed(&app);
        assert_eq!(injector.typed_text(), "hellohellohello");
        assert_eq!(injector.submit_count(), 3);
        let pauses = injector.pauses();
        assert_eq!(
            pauses.iter().filter(|d| **d == Duration::from_millis(500)).count(),
            3
        );
        assert_eq!(
            pauses.iter().filter(|d| **d == Duration::from_millis(100)).count(),
            15
        );
        assert!(injector
            .actions
            .iter()
            .all(|a| !matches!(a, KeyAction::Submit(SubmitKey::Enter))));
    }

    #[test]
    fn prompts_use_the_configured_title_and_messages() {
        let (mut app, _) = app(&[Some("x"), Some("1")]);
        app.run().unwrap();

        let requests = &app.prompt.requests;
        assert_eq!(requests[0], PromptRequest::new("Line Repeater", LINE_MESSAGE));
        assert_eq!(requests[1], PromptRequest::new("Line Repeater", COUNT_MESSAGE));
    }

    #[test]
    fn acknowledgment_embeds_count_and_countdown() {
        let (mut app, slept) = app(&[Some("hi"), Some(" 4 ")]);
        app.run().unwrap();

        let ack = &app.prompt.acknowledged;
        assert_eq!(ack.len(), 1);
        assert!(ack[0].starts_with("The line will be repeated 4 times."));
        assert!(ack[0].ends_with("in 7 Seconds."));
        assert_eq!(*slept.borrow(), vec![Duration::from_secs(1); 7]);
    }

    #[test]
    fn countdown_and_delay_can_be_overridden() {
        let (app, slept) = app(&[Some("ab"), Some("2")]);
        let mut app = app
            .with_countdown(Duration::from_millis(2500))
            .with_repeat_delay(Duration::from_millis(250));
        app.run().unwrap();

        assert_eq!(
            *slept.borrow(),
            vec![
                Duration::from_millis(500),
                Duration::from_secs(1),
                Duration::from_secs(1)
            ]
        );
        let inter = typed(&app)
            .pauses()
            .into_iter()
            .filter(|d| *d == Duration::from_millis(250))
            .count();
        assert_eq!(inter, 2);
    }

    #[test]
    fn cancelling_the_line_prompt_types_nothing() {
        let (mut app, slept) = app(&[None]);

        assert_eq!(app.run().unwrap(), RunOutcome::Cancelled);
        assert!(app.injector.is_none());
        assert!(app.prompt.acknowledged.is_empty());
        assert_eq!(app.prompt.requests.len(), 1);
        assert!(slept.borrow().is_empty());
    }

    #[test]
    fn cancelling_the_count_prompt_types_nothing() {
        let (mut app, _) = app(&[Some("hello"), None]);

        assert_eq!(app.run().unwrap(), RunOutcome::Cancelled);
        assert!(app.injector.is_none());
    }

    #[test]
    fn dismissing_the_start_message_cancels_before_the_countdown() {
        let prompt = ScriptedPrompt {
            decline_start: true,
            ..ScriptedPrompt::new(&[Some("hello"), Some("3")])
        };
        let (mut app, slept) = app_with(prompt);

        assert_eq!(app.run().unwrap(), RunOutcome::Cancelled);
        assert_eq!(app.prompt.acknowledged.len(), 1);
        assert!(typed(&app).actions.is_empty());
        assert!(slept.borrow().is_empty());
    }

    #[test]
    fn non_numeric_count_is_reported_and_reprompted() {
        let (mut app, _) = app(&[Some("hello"), Some("abc"), Some("2")]);

        assert_eq!(app.run().unwrap(), RunOutcome::Completed { repetitions: 2 });
        assert_eq!(app.prompt.errors.len(), 1);
        assert!(app.prompt.errors[0].contains("'abc'"));
        assert_eq!(app.prompt.requests.len(), 3);
        assert_eq!(typed(&app).submit_count(), 2);
    }

    #[test]
    fn persistent_invalid_count_is_an_input_error() {
        let (mut app, _) = app(&[Some("hello"), Some("abc"), Some("-1"), Some("1.5")]);

        let err = app.run().unwrap_err();
        match err {
            AppError::Input(InputError::InvalidCount { value, attempts }) => {
                assert_eq!(value, "1.5");
                assert_eq!(attempts, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(app.prompt.errors.len(), 2);
        assert!(app.injector.is_none());
    }

    #[test]
    fn zero_count_completes_without_typing() {
        let (mut app, _) = app(&[Some("hello"), Some("0")]);

        assert_eq!(app.run().unwrap(), RunOutcome::Completed { repetitions: 0 });
        assert!(typed(&app).actions.is_empty());
    }

    #[test]
    fn missing_accessibility_stops_before_connecting_the_keyboard() {
        let connected = Rc::new(Cell::new(false));
        let flag = Rc::clone(&connected);
        let mut app = App::new(
            Settings::default(),
            ScriptedPrompt::new(&[Some("hello"), Some("3")]),
            move || {
                flag.set(true);
                Ok(RecordingInjector::default())
            },
        )
        .with_sleeper(|_| {})
        .with_accessibility_check(|| Err(SystemError::Permission("not trusted".to_string())));

        let err = app.run().unwrap_err();
        assert!(matches!(err, AppError::System(SystemError::Permission(_))));
        assert!(!connected.get());
        assert!(app.injector.is_none());
        assert_eq!(app.prompt.requests.len(), 2);
        assert!(app.prompt.acknowledged.is_empty());
    }

    #[test]
    fn keyboard_failure_surfaces_after_the_prompts() {
        let mut app: TestApp = App::new(
            Settings::default(),
            ScriptedPrompt::new(&[Some("hello"), Some("3")]),
            || Err(KeyError::Init("no display".to_string())),
        )
        .with_sleeper(|_| {})
        .with_accessibility_check(|| Ok(()));

        let err = app.run().unwrap_err();
        assert!(matches!(err, AppError::Keys(KeyError::Init(_))));
        assert_eq!(app.prompt.requests.len(), 2);
        assert!(app.prompt.acknowledged.is_empty());
    }

    #[test]
    fn unrepresentable_settings_are_rejected_before_prompting() {
        let settings = Settings {
            countdown_secs: 1e20,
            ..Settings::default()
        };
        let mut app: TestApp = App::new(
            settings,
            ScriptedPrompt::new(&[Some("hello"), Some("3")]),
            || Ok(RecordingInjector::default()),
        )
        .with_sleeper(|_| {});

        let err = app.run().unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::Invalid(_))));
        assert!(app.prompt.requests.is_empty());
    }

    #[test]
    fn parse_count_accepts_trimmed_non_negative_integers() {
        assert_eq!(parse_count("3"), Some(3));
        assert_eq!(parse_count(" 12\t"), Some(12));
        assert_eq!(parse_count("0"), Some(0));
        assert_eq!(parse_count("abc"), None);
        assert_eq!(parse_count("-2"), None);
        assert_eq!(parse_count(""), None);
    }
}
