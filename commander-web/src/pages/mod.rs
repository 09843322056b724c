mod error;
mod login;
mod section;
mod setup;
mod users;

pub use error::ErrorPage;
pub use login::LoginPage;
pub use section::SectionPage;
pub use setup::SetupPage;
pub use users::UsersPage;

use web_sys::HtmlInputElement;
use yew::functional::UseStateHandle;
use yew::{Callback, InputEvent, TargetCast};

/// Copies an input's value into `value` on every keystroke.
fn bind_input(value: &UseStateHandle<String>) -> Callback<InputEvent> {
    let value = value.clone();
    Callback::from(move |event: InputEvent| {
        if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
            value.set(input.value());
        }
    })
}
