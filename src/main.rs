mod components;
mod config;
mod error;
mod format;
mod roc;
mod stock;

use yew::prelude::*;

use components::{RocCalculator, StockCalculator};
use config::AppConfig;

#[derive(Properties, PartialEq, Default)]
pub struct AppProps {
    #[prop_or_default]
    pub config: AppConfig,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    html! {
        <div class="container">
            <header>
                <h1>{"Capital Calc"}</h1>
                <div class="tooltip pill" data-tooltip="Return on capital and stock target price calculators">
                    {"Calculators"}
                </div>
            </header>

            <div class="grid">
                <RocCalculator config={props.config.roc} />
                <StockCalculator />
            </div>

            <footer>
                {"Capital Calc v0.1 - results are rounded to two decimals"}
            </footer>
        </div>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
