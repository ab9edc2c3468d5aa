use crate::app::Route;
use crate::utils::*;
use sapper_core as game;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct HighScoresProps {
    pub navigate: Callback<Route>,
}

#[derive(Properties, Clone, PartialEq)]
struct ScoreTableProps {
    size: game::BoardSize,
    entries: Vec<game::HighScoreEntry>,
}

#[function_component(ScoreTable)]
fn score_table(props: &ScoreTableProps) -> Html {
    html! {
        <section class={classes!("scores", props.size.key())}>
            <h2>{props.size.label()}</h2>
            <table>
                <thead>
                    <tr><th>{"Rank"}</th><th>{"Time"}</th><th>{"Date"}</th></tr>
                </thead>
                <tbody>
                    {
                        for props.entries.iter().enumerate().map(|(index, entry)| html! {
                            <tr>
                                <td>{index + 1}</td>
                                <td>{format_time(entry.elapsed_seconds)}</td>
                                <td>{format_date(&entry.timestamp)}</td>
                            </tr>
                        })
                    }
                </tbody>
            </table>
        </section>
    }
}

/// Fastest wins per board size, read fresh from local storage on every mount.
#[function_component(HighScoresView)]
pub(crate) fn high_scores_view(props: &HighScoresProps) -> Html {
    let table = use_memo((), |_| game::load_scores(&BrowserStore));
    let back = props.navigate.reform(|_: MouseEvent| Route::Game);

    let body = if table.is_empty() {
        html! { <p class="empty">{"No high scores yet!"}</p> }
    } else {
        html! {
            <>
                {
                    for table.iter().map(|(size, entries)| html! {
                        <ScoreTable {size} entries={entries.to_vec()}/>
                    })
                }
            </>
        }
    };

    html! {
        <div class="high-scores">
            <header>
                <h1>{"Minesweeper High Scores"}</h1>
                <button onclick={back}>{"Back to Game"}</button>
            </header>
            {body}
        </div>
    }
}
