use yew::prelude::*;

use crate::game::GameView;
use crate::scores::HighScoresView;

/// The two screens of the app.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum Route {
    #[default]
    Game,
    HighScores,
}

#[derive(Properties, Clone, Debug, PartialEq)]
pub(crate) struct AppProps {
    /// Mine-placement seed forced through the location hash
    #[prop_or_default]
    pub seed: Option<u64>,
}

#[function_component(App)]
pub(crate) fn app(props: &AppProps) -> Html {
    let route = use_state(Route::default);
    let navigate = {
        let route = route.clone();
        Callback::from(move |to: Route| {
            log::debug!("navigate to {:?}", to);
            route.set(to);
        })
    };

    match *route {
        Route::Game => html! {
            <GameView seed={props.seed} {navigate}/>
        },
        Route::HighScores => html! {
            <HighScoresView {navigate}/>
        },
    }
}
