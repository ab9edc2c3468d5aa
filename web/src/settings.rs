use sapper_core as game;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct SettingsProps {
    pub open: bool,
    pub current: game::BoardSize,
    pub on_select: Callback<game::BoardSize>,
    pub on_close: Callback<()>,
}

/// Board size picker; picking a size starts a new game.
#[function_component(SettingsView)]
pub(crate) fn settings_view(props: &SettingsProps) -> Html {
    if !props.open {
        return html! {};
    }

    let on_close = props.on_close.reform(|_: MouseEvent| ());

    html! {
        <dialog class="settings" open=true>
            <h2>{"Board Size"}</h2>
            <menu>
                {
                    for game::BoardSize::ALL.into_iter().map(|size| {
                        let class = classes!((size == props.current).then_some("active"));
                        let onclick = props.on_select.reform(move |_: MouseEvent| size);
                        html! {
                            <button {class} {onclick}>{size.label()}</button>
                        }
                    })
                }
            </menu>
            <button onclick={on_close}>{"Back to Game"}</button>
        </dialog>
    }
}
