use crate::app::Route;
use crate::settings::SettingsView;
use crate::utils::*;
use bitflags::bitflags;
use gloo::timers::callback::Interval;
use sapper_core as game;
use yew::prelude::*;

/// What a single cell looks like on screen.
#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCellState {
    Hidden,
    Flagged,
    Revealed(u8),
    Mine,
}

impl From<game::Cell> for ViewCellState {
    fn from(cell: game::Cell) -> Self {
        match cell.cover() {
            game::Cover::Hidden => Self::Hidden,
            game::Cover::Flagged => Self::Flagged,
            game::Cover::Revealed if cell.has_mine() => Self::Mine,
            game::Cover::Revealed => Self::Revealed(cell.adjacent_mines()),
        }
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct CellPointerState {
    pos: game::Coord2,
    buttons: MouseButtons,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum CellMsg {
    Update(CellPointerState),
    Leave,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellEvent(CellMsg),
    Tick,
    NewGame,
    ToggleSettings,
    SelectSize(game::BoardSize),
    ShowHighScores,
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    row: game::Coord,
    col: game::Coord,
    cell_state: ViewCellState,
    #[prop_or_default]
    pressed: bool,
    callback: Callback<CellMsg>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    use ViewCellState::*;

    let CellProps {
        row,
        col,
        cell_state,
        pressed,
        callback,
    } = props.clone();

    let mut class = classes!(
        "cell",
        match cell_state {
            Hidden => classes!(),
            Flagged => classes!("flag"),
            Revealed(count) => classes!("open", format!("num-{}", count)),
            Mine => classes!("open", "mine"),
        }
    );
    if pressed {
        class.push("open");
    }

    let content = match cell_state {
        Hidden | Revealed(0) => String::new(),
        Flagged => "🚩".to_string(),
        Revealed(count) => count.to_string(),
        Mine => "💣".to_string(),
    };

    let pointer_update = |event_name: &'static str| {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            callback.emit(CellMsg::Update(CellPointerState {
                pos: (row, col),
                buttons,
            }));
            log::trace!("({}, {}) {} ({:?})", row, col, event_name, buttons);
        })
    };
    let onmousedown = pointer_update("mouse down");
    let onmouseup = pointer_update("mouse up");
    let onmouseenter = pointer_update("mouse enter");

    let onmouseleave = Callback::from(move |_: MouseEvent| {
        callback.emit(CellMsg::Leave);
        log::trace!("({}, {}) mouse leave", row, col);
    });

    html! {
        <td {class} {onmousedown} {onmouseup} {onmouseenter} {onmouseleave}>{content}</td>
    }
}

/// Handle of the one-second clock, alive only while the session timer runs.
struct TimerSlot<T = Interval> {
    handle: Option<T>,
}

impl<T> Default for TimerSlot<T> {
    fn default() -> Self {
        Self { handle: None }
    }
}

impl<T> TimerSlot<T> {
    /// Starts a fresh handle when `running` turns on and drops it when it turns off.
    ///
    /// Returns whether a handle was started.
    fn sync(&mut self, running: bool, start: impl FnOnce() -> T) -> bool {
        match (running, self.handle.is_some()) {
            (true, false) => {
                self.handle = Some(start());
                true
            }
            (false, true) => {
                self.handle = None;
                false
            }
            _ => false,
        }
    }

    fn is_active(&self) -> bool {
        self.handle.is_some()
    }
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Seed used for every new game instead of a random one
    #[prop_or_default]
    pub seed: Option<u64>,
    pub navigate: Callback<Route>,
}

pub(crate) struct GameView {
    session: game::GameSession,
    settings_open: bool,
    current_cell_state: Option<CellPointerState>,
    timer: TimerSlot,
}

impl GameView {
    fn new_session(size: game::BoardSize, forced_seed: Option<u64>) -> game::GameSession {
        let seed = forced_seed.unwrap_or_else(js_random_seed);
        log::debug!("new {} game, seed {}", size.key(), seed);
        game::GameSession::new(size, seed)
    }

    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(1000, move || link.send_message(Msg::Tick))
    }

    /// Keeps the clock alive exactly while the session timer runs.
    fn sync_timer(&mut self, ctx: &Context<Self>) {
        let was_active = self.timer.is_active();
        if self.timer.sync(self.session.is_timer_running(), || GameView::create_timer(ctx)) {
            log::debug!("clock started");
        } else if was_active && !self.timer.is_active() {
            log::debug!("clock stopped at {}s", self.session.elapsed_seconds());
        }
    }

    fn reveal_cell(&mut self, coords: game::Coord2) -> bool {
        let outcome = self.session.reveal(coords);
        if outcome == game::RevealOutcome::Won {
            self.record_win();
        }
        outcome.has_update()
    }

    fn flag_cell(&mut self, coords: game::Coord2) -> bool {
        self.session.toggle_flag(coords).has_update()
    }

    fn record_win(&self) {
        let size = self.session.size();
        let seconds = self.session.elapsed_seconds();
        let timestamp = iso_timestamp(utc_now());
        match game::save_score(&mut BrowserStore, size, seconds, timestamp) {
            Ok(Some(rank)) => log::info!("new high score #{} on {}: {}s", rank + 1, size.key(), seconds),
            Ok(None) => log::debug!("{}s on {} did not make the table", seconds, size.key()),
            Err(err) => log::error!("could not save high score: {}", err),
        }
    }

    fn status_class(&self) -> &'static str {
        use game::GameStatus::*;
        match self.session.status() {
            Playing if self.is_mid_open() => "mid-open",
            Playing if !self.session.first_click_done() => "not-started",
            Playing => "in-progress",
            Won => "win",
            Lost => "lose",
        }
    }

    fn status_face(&self) -> &'static str {
        use game::GameStatus::*;
        match self.session.status() {
            Playing => "😊",
            Won => "😎",
            Lost => "😵",
        }
    }

    fn status_label(&self) -> &'static str {
        use game::GameStatus::*;
        match self.session.status() {
            Playing => "playing",
            Won => "won",
            Lost => "lost",
        }
    }

    fn is_mid_open(&self) -> bool {
        matches!(
            self.current_cell_state,
            Some(CellPointerState {
                buttons: MouseButtons::LEFT,
                ..
            })
        )
    }

    fn is_pressed(&self, coords: game::Coord2, cell_state: ViewCellState) -> bool {
        !self.session.is_finished()
            && cell_state == ViewCellState::Hidden
            && matches!(
                self.current_cell_state,
                Some(CellPointerState { pos, buttons: MouseButtons::LEFT }) if pos == coords
            )
    }

    fn on_cell_event(&mut self, msg: CellMsg) -> bool {
        match msg {
            CellMsg::Leave => {
                log::trace!("cell leave");
                self.current_cell_state.take().is_some()
            }
            CellMsg::Update(cell_state) if cell_state.buttons.is_empty() => {
                // buttons released over cell_state.pos, act on what was held before
                match self.current_cell_state.take() {
                    None => false,
                    Some(CellPointerState { pos, buttons }) => match buttons {
                        MouseButtons::LEFT => {
                            log::debug!("reveal cell: {:?}", pos);
                            self.reveal_cell(pos);
                            true
                        }
                        MouseButtons::RIGHT => {
                            log::debug!("flag cell: {:?}", pos);
                            self.flag_cell(pos);
                            true
                        }
                        // several buttons at once cancels, still redraw to unpress
                        _ => true,
                    },
                }
            }
            CellMsg::Update(cell_state) => match self.current_cell_state.replace(cell_state) {
                None => true,
                Some(CellPointerState { pos, buttons }) => {
                    pos != cell_state.pos
                        || (buttons & MouseButtons::LEFT) != (cell_state.buttons & MouseButtons::LEFT)
                }
            },
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let size: game::BoardSize = LocalOrDefault::local_or_default();
        Self {
            session: GameView::new_session(size, ctx.props().seed),
            settings_open: false,
            current_cell_state: None,
            timer: TimerSlot::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let changed = match msg {
            CellEvent(cell_msg) => self.on_cell_event(cell_msg),
            Tick => self.session.tick(),
            NewGame => {
                self.session = GameView::new_session(self.session.size(), ctx.props().seed);
                self.current_cell_state = None;
                true
            }
            ToggleSettings => {
                self.settings_open = !self.settings_open;
                true
            }
            SelectSize(size) => {
                size.local_save();
                self.session = GameView::new_session(size, ctx.props().seed);
                self.settings_open = false;
                true
            }
            ShowHighScores => {
                ctx.props().navigate.emit(Route::HighScores);
                false
            }
        };
        self.sync_timer(ctx);
        changed
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let size = self.session.size();
        let (rows, cols) = self.session.board().size();
        let status_class = self.status_class();
        let is_playable = !self.session.is_finished();
        let mines_left = format_for_counter(self.session.mines_left());
        let elapsed_time = format_time(self.session.elapsed_seconds());

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            NewGame
        });
        let cb_toggle_settings = ctx.link().callback(|_| ToggleSettings);
        let cb_show_scores = ctx.link().callback(|_| ShowHighScores);
        let cb_select_size = ctx.link().callback(SelectSize);
        let cb_close_settings = ctx.link().callback(|_: ()| ToggleSettings);

        html! {
            <div class={classes!("sapper", size.key())} oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <header>
                    <h1>{"Minesweeper"}</h1>
                    <menu>
                        <button title="Reset" onclick={cb_new_game.clone()}>{"🔄"}</button>
                        <button title="Settings" onclick={cb_toggle_settings}>{"⚙️"}</button>
                        <button title="High Scores" onclick={cb_show_scores}>{"🏆"}</button>
                    </menu>
                </header>
                <nav>
                    <aside title="Mines left">{mines_left}</aside>
                    <span><button class={status_class} onclick={cb_new_game}>{self.status_face()}</button></span>
                    <aside title="Time">{elapsed_time}</aside>
                </nav>
                <p class="status">{"Status: "}{self.status_label()}</p>
                <table class={classes!(is_playable.then_some("playable"))}>
                    {
                        for (0..rows).map(|row| html! {
                            <tr>
                                {
                                    for (0..cols).map(|col| {
                                        let pos = (row, col);
                                        let cell_state = self
                                            .session
                                            .cell_at(pos)
                                            .map_or(ViewCellState::Hidden, ViewCellState::from);
                                        let pressed = self.is_pressed(pos, cell_state);
                                        let callback = ctx.link().callback(Msg::CellEvent);
                                        html! {
                                            <CellView {row} {col} {cell_state} {callback} {pressed}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <SettingsView
                    open={self.settings_open}
                    current={size}
                    on_select={cb_select_size}
                    on_close={cb_close_settings}
                />
            </div>
        }
    }
}
