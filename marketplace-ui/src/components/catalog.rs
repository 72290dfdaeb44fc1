//! Plugin Catalog
//!
//! One filter button per category; only the active category's listings are
//! shown.

use leptos::*;
use marketplace::{Category, PluginListing};

use crate::state::global::GlobalState;

#[component]
pub fn CatalogSection() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let active = state.category;
    let listings = state.app.catalog().listings().to_vec();

    view! {
        <section class="catalog">
            <div class="filters">
                {Category::ALL
                    .into_iter()
                    .map(|category| view! { <FilterButton category=category /> })
                    .collect_view()}
            </div>

            {Category::ALL
                .into_iter()
                .map(|category| {
                    let items: Vec<PluginListing> = listings
                        .iter()
                        .filter(|l| l.category == category)
                        .cloned()
                        .collect();
                    view! {
                        <div class=move || {
                            if active.get() == category {
                                format!("category {} active", category.as_str())
                            } else {
                                format!("category {}", category.as_str())
                            }
                        }>
                            {items
                                .into_iter()
                                .map(|listing| view! { <PluginCard listing=listing /> })
                                .collect_view()}
                        </div>
                    }
                })
                .collect_view()}
        </section>
    }
}

#[component]
fn FilterButton(category: Category) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let active = state.category;

    view! {
        <button
            class=move || {
                if active.get() == category { "filter-btn active" } else { "filter-btn" }
            }
            data-filter=category.as_str()
            on:click=move |_| state.select_category(category)
        >
            {category.label()}
        </button>
    }
}

#[component]
fn PluginCard(listing: PluginListing) -> impl IntoView {
    view! {
        <article class="plugin">
            <h3>{listing.name}</h3>
            <p>{listing.description}</p>
            <span class="price">{listing.price}</span>
        </article>
    }
}
