use anyhow::anyhow;

/// Connectivity represents the "connected" state of a faked port and provides common
/// behavior for returning an error if the fake is configured to be in a disconnected state.
pub enum Connectivity {
    Connected,
    Disconnected,
}

impl Connectivity {
    /// Return an error if connectivity is in a "disconnected" state
    pub fn blow_up_if_disconnected(&self) -> Result<(), anyhow::Error> {
        match self {
            Self::Connected => Ok(()),
            Self::Disconnected => Err(anyhow!("could not connect to service!")),
        }
    }
}

/// FakeImplementation stands in for a single trait method on a mock: it records the arguments
/// of every call and hands back a preconfigured return value. Mocking tools don't get along with
/// async trait methods, so mocks wrap themselves in a [std::sync::Mutex] and implement the trait
/// on that instead.
///
/// * [Args] is the tuple of captured arguments for one call
/// * [Ret] is the method's return type
///
/// # Example
///
/// ```ignore
/// use crate::test_util::FakeImplementation;
/// use std::sync::Mutex;
///
/// trait TaskCounter {
///     async fn count_for_user(&self, user_id: i32) -> usize;
/// }
///
/// struct MockTaskCounter {
///     count_for_user_result: FakeImplementation<i32, usize>,
/// }
///
/// impl TaskCounter for Mutex<MockTaskCounter> {
///     async fn count_for_user(&self, user_id: i32) -> usize {
///         let mut locked_self = self.lock().expect("mock mutex poisoned");
///         locked_self.count_for_user_result.save_arguments(user_id);
///
///         locked_self.count_for_user_result.return_value()
///     }
/// }
/// ```
pub struct FakeImplementation<Args, Ret> {
    saved_arguments: Vec<Args>,
    return_value: Option<Ret>,
}

impl<Args, Ret> FakeImplementation<Args, Ret> {
    pub fn new() -> FakeImplementation<Args, Ret> {
        FakeImplementation {
            saved_arguments: Vec::new(),
            return_value: None,
        }
    }

    /// Records the arguments of a single invocation
    pub fn save_arguments(&mut self, arguments: Args) {
        self.saved_arguments.push(arguments)
    }

    /// Arguments from every invocation so far, oldest first
    pub fn calls(&self) -> &[Args] {
        self.saved_arguments.as_slice()
    }
}

impl<Args, Ret> FakeImplementation<Args, Ret>
where
    Ret: Clone,
{
    pub fn set_return_value(&mut self, return_value: Ret) {
        self.return_value = Some(return_value)
    }

    pub fn return_value(&self) -> Ret {
        match self.return_value {
            None => panic!("Tried to return from a function where the return value wasn't set!"),
            Some(ref ret_val) => ret_val.clone(),
        }
    }
}
