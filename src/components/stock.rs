use gloo::console;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::stock::{Dispatch, FieldSink, StockField, StockSession, StockView};

/// The three input boxes. Derived values land here without firing `oninput`.
#[derive(Clone)]
struct FieldStates {
    current: UseStateHandle<String>,
    percent: UseStateHandle<String>,
    target: UseStateHandle<String>,
}

impl FieldStates {
    fn handle(&self, field: StockField) -> &UseStateHandle<String> {
        match field {
            StockField::CurrentPrice => &self.current,
            StockField::PercentChange => &self.percent,
            StockField::TargetPrice => &self.target,
        }
    }
}

impl FieldSink for FieldStates {
    fn write(&self, field: StockField, text: &str) {
        self.handle(field).set(text.to_string());
    }
}

#[function_component(StockCalculator)]
pub fn stock_calculator() -> Html {
    let session = use_memo((), |_| StockSession::new());
    let fields = FieldStates {
        current: use_state(String::new),
        percent: use_state(String::new),
        target: use_state(String::new),
    };
    let view = use_state(StockView::default);

    let show = {
        let session = session.clone();
        let view = view.clone();
        move |outcome: Dispatch| match outcome {
            Dispatch::Applied(v) => {
                console::debug!(format!("stock: {:?} {:?}", session.mode(), v));
                view.set(v);
            }
            Dispatch::Suppressed => {
                console::log!(format!("stock: ignored echo during {:?}", session.phase()))
            }
        }
    };

    let on_input = |field: StockField| {
        let session = session.clone();
        let fields = fields.clone();
        let show = show.clone();
        Callback::from(move |e: InputEvent| {
            let target: HtmlInputElement = e.target_unchecked_into();
            let raw = target.value();
            fields.handle(field).set(raw.clone());
            show(session.on_input(field, &raw, &fields));
        })
    };
    let on_enter = {
        let session = session.clone();
        let fields = fields.clone();
        let show = show.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                show(session.on_submit(&fields));
            }
        })
    };

    html! {
        <div class="card">
            <h2><span>{"Stock Target Price"}</span></h2>

            <div class="input-group">
                <label>{"Current Price ($)"}</label>
                <input
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder={"e.g. 100"}
                    value={(*fields.current).clone()}
                    oninput={on_input(StockField::CurrentPrice)}
                    onkeypress={on_enter.clone()}
                    aria-label="Current price" />
            </div>

            <div class="row">
                <div class="input-group">
                    <label class="tooltip" data-tooltip="Editing this recalculates the target price">
                        {"Change (%)"}
                    </label>
                    <input
                        type="number"
                        step="0.01"
                        placeholder={"e.g. 20"}
                        value={(*fields.percent).clone()}
                        oninput={on_input(StockField::PercentChange)}
                        onkeypress={on_enter.clone()}
                        aria-label="Percent change" />
                </div>
                <div class="input-group">
                    <label class="tooltip" data-tooltip="Editing this recalculates the percent change">
                        {"Target Price ($)"}
                    </label>
                    <input
                        type="number"
                        step="0.01"
                        min="0"
                        placeholder={"e.g. 120"}
                        value={(*fields.target).clone()}
                        oninput={on_input(StockField::TargetPrice)}
                        onkeypress={on_enter}
                        aria-label="Target price" />
                </div>
            </div>

            <div class={view.css_class()}>
                <div class="metric-grid">
                    <div class="metric-item">
                        <div class="metric-value">{view.target_text.clone()}</div>
                        <div class="metric-label">{"Target Price"}</div>
                    </div>
                    <div class="metric-item">
                        <div class="metric-value">{view.percent_text.clone()}</div>
                        <div class="metric-label">{"Change"}</div>
                    </div>
                </div>
            </div>
        </div>
    }
}
