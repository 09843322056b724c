use yew::{AttrValue, Html, Properties, function_component, html};

#[derive(Properties, PartialEq)]
pub struct SectionPageProps {
    pub title: AttrValue,
    #[prop_or_default]
    pub description: AttrValue,
}

/// Heading and summary for sections whose content is served by the
/// backend's own views.
#[function_component(SectionPage)]
pub fn section_page(props: &SectionPageProps) -> Html {
    html! {
        <div class="p-4 space-y-6">
            <h1 class="text-2xl font-bold">{ props.title.clone() }</h1>
            if !props.description.is_empty() {
                <p class="opacity-80">{ props.description.clone() }</p>
            }
        </div>
    }
}
