use gloo::console;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::BrowserAlert;
use crate::config::RocConfig;
use crate::roc::{RocController, RocTrigger, RocView};

#[derive(Properties, PartialEq)]
pub struct RocProps {
    #[prop_or_default]
    pub config: RocConfig,
}

#[function_component(RocCalculator)]
pub fn roc_calculator(props: &RocProps) -> Html {
    let expected = use_state(String::new);
    let total = use_state(String::new);
    let view = use_state(RocView::default);
    let config = props.config;
    let controller = use_mut_ref(move || RocController::new(config));

    let run = {
        let controller = controller.clone();
        let view = view.clone();
        Callback::from(move |(trigger, e, t): (RocTrigger, String, String)| {
            let mut ctl = controller.borrow_mut();
            // props may have changed since the controller was created
            ctl.set_config(config);
            match ctl.handle(trigger, &e, &t, &BrowserAlert) {
                Ok(r) => console::debug!(format!("roc: {} / {} -> {}%", e, t, r.percentage)),
                Err(err) => console::debug!(format!("roc: {:?}", err)),
            }
            view.set(ctl.view().clone());
        })
    };

    let on_expected_input = {
        let expected = expected.clone();
        let total = total.clone();
        let run = run.clone();
        Callback::from(move |e: InputEvent| {
            let target: HtmlInputElement = e.target_unchecked_into();
            let value = target.value();
            expected.set(value.clone());
            run.emit((RocTrigger::Input, value, (*total).clone()));
        })
    };
    let on_total_input = {
        let expected = expected.clone();
        let total = total.clone();
        let run = run.clone();
        Callback::from(move |e: InputEvent| {
            let target: HtmlInputElement = e.target_unchecked_into();
            let value = target.value();
            total.set(value.clone());
            run.emit((RocTrigger::Input, (*expected).clone(), value));
        })
    };
    let on_enter = {
        let expected = expected.clone();
        let total = total.clone();
        let run = run.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                run.emit((RocTrigger::Submit, (*expected).clone(), (*total).clone()));
            }
        })
    };
    let on_calculate = {
        let expected = expected.clone();
        let total = total.clone();
        Callback::from(move |_: MouseEvent| {
            run.emit((RocTrigger::Submit, (*expected).clone(), (*total).clone()));
        })
    };

    html! {
        <div class="card">
            <h2><span>{"Return on Capital"}</span></h2>

            <div class="input-group">
                <label>{"Expected Return ($)"}</label>
                <input
                    type="number"
                    step="0.01"
                    placeholder={"e.g. 150"}
                    value={(*expected).clone()}
                    oninput={on_expected_input}
                    onkeypress={on_enter.clone()}
                    aria-label="Expected return" />
            </div>

            <div class="input-group">
                <label>{"Total Investment ($)"}</label>
                <input
                    type="number"
                    step="0.01"
                    placeholder={"e.g. 1000"}
                    value={(*total).clone()}
                    oninput={on_total_input}
                    onkeypress={on_enter}
                    aria-label="Total investment" />
            </div>

            { if props.config.calculate_button {
                html!{ <button onclick={on_calculate} aria-label="Calculate return">{"Calculate"}</button> }
            } else { html!{} }}

            <div class={view.css_class()}>
                <div class="muted">{"Percentage Return"}</div>
                <div class="result large">{view.text.clone()}</div>
            </div>
        </div>
    }
}
