//! Facet filters: mechanics tag cloud, multi-selects and numeric ranges

use boardshelf_core::facets::{ranked, tag_cloud};
use boardshelf_core::{FilterField, MultiField};
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlOptionElement, HtmlSelectElement};

use crate::state::CatalogState;

/// Range inputs in display order: field, label, step
const RANGES: [(FilterField, &str, &str); 7] = [
    (FilterField::YearMin, "Year from", "1"),
    (FilterField::YearMax, "Year to", "1"),
    (FilterField::Players, "Players", "1"),
    (FilterField::TimeMax, "Max time (min)", "5"),
    (FilterField::WeightMin, "Weight from", "0.1"),
    (FilterField::WeightMax, "Weight to", "0.1"),
    (FilterField::RatingMin, "Min rating", "0.1"),
];

fn selected_values(select: &HtmlSelectElement) -> Vec<String> {
    let options = select.selected_options();
    (0..options.length())
        .filter_map(|i| options.item(i))
        .filter_map(|el| el.dyn_into::<HtmlOptionElement>().ok())
        .map(|opt| opt.value())
        .collect()
}

#[component]
fn MechanicsCloud(state: CatalogState) -> impl IntoView {
    let tags = move || {
        state
            .facets
            .with(|c| c.as_ref().map(|c| tag_cloud(&c.mechanics)).unwrap_or_default())
    };

    view! {
        <div class="sidebar-section">
            <div class="section-header">"Mechanics"</div>
            <div class="tag-cloud">
                {move || {
                    tags()
                        .into_iter()
                        .map(|tag| {
                            let name = tag.name.clone();
                            let toggle = tag.name.clone();
                            let font_size = tag.font_size();
                            let title = format!("{} game(s)", tag.count);
                            view! {
                                <button
                                    class="tag"
                                    class:active=move || state.filters.with(|f| f.is_mechanic_selected(&name))
                                    style:font-size=font_size
                                    title=title
                                    on:click=move |_| state.mutate(|s| s.toggle_mechanic(&toggle))
                                >
                                    {tag.name}
                                </button>
                            }
                        })
                        .collect_view()
                }}
            </div>
        </div>
    }
}

#[component]
fn FacetSelect(state: CatalogState, field: MultiField) -> impl IntoView {
    let options = move || {
        state
            .facets
            .with(|c| c.as_ref().map(|c| ranked(c.get(field.facet()))).unwrap_or_default())
    };

    view! {
        <div class="sidebar-section">
            <label class="section-header">{field.facet().label()}</label>
            <select
                class="facet-select"
                multiple=true
                size="6"
                on:change=move |ev| {
                    let select = event_target::<HtmlSelectElement>(&ev);
                    let values = selected_values(&select);
                    state.mutate(|s| s.set_multi(field, values));
                }
            >
                {move || {
                    options()
                        .into_iter()
                        .map(|facet| {
                            let name = facet.name.clone();
                            let label = facet.option_label();
                            view! {
                                <option
                                    value=facet.name.clone()
                                    prop:selected=move || {
                                        state.filters.with(|f| f.multi(field).contains(&name))
                                    }
                                >
                                    {label}
                                </option>
                            }
                        })
                        .collect_view()
                }}
            </select>
        </div>
    }
}

#[component]
fn RangeInputs(state: CatalogState) -> impl IntoView {
    view! {
        <div class="sidebar-section ranges">
            {RANGES
                .into_iter()
                .map(|(field, label, step)| {
                    view! {
                        <label class="range-input">
                            <span>{label}</span>
                            <input
                                type="number"
                                step=step
                                prop:value=move || {
                                    state.filters.with(|f| f.get(field).unwrap_or_default().to_string())
                                }
                                on:change=move |ev| state.set_field(field, event_target_value(&ev))
                            />
                        </label>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
pub fn Sidebar(state: CatalogState) -> impl IntoView {
    let summary = move || {
        state.filters.with(|f| {
            f.summary()
                .into_iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <aside class="sidebar">
            <div class="sidebar-header">
                <span>"Filters"</span>
                <button class="clear-btn" on:click=move |_| state.clear()>
                    "Clear"
                </button>
            </div>
            <div class="active-filters">
                <Show
                    when=move || !summary().is_empty()
                    fallback=|| view! { <span class="empty">"No filters"</span> }
                >
                    <ul>
                        {move || summary().into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
                    </ul>
                </Show>
            </div>
            <MechanicsCloud state=state />
            {MultiField::ALL
                .into_iter()
                .map(|field| view! { <FacetSelect state=state field=field /> })
                .collect_view()}
            <RangeInputs state=state />
        </aside>
    }
}
