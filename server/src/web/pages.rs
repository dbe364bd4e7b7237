use chefart_core::pipeline::{Generation, VariantOutcome};
use chefart_core::{FormatSpec, StylePreset, BUILD_ID};
use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::GenerateForm;

const STYLES: &str = "\
body { font-family: system-ui, sans-serif; margin: 0; background: #fafafa; color: #222; }
.layout { display: flex; min-height: 100vh; }
.sidebar { width: 260px; padding: 24px; background: #f0f2f6; box-sizing: border-box; }
.main { flex: 1; padding: 24px 40px; }
.fields { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }
label { display: block; font-weight: 600; margin: 12px 0 4px; }
input[type=text], textarea, select { width: 100%; box-sizing: border-box; padding: 8px; font: inherit; }
textarea { height: 100px; }
.radio label, .toggle label { font-weight: normal; display: inline; margin: 0; }
.radio div { margin: 4px 0; }
button { width: 100%; margin-top: 20px; padding: 12px; font-size: 16px; cursor: pointer; }
.notice { padding: 12px 16px; border-radius: 6px; margin: 16px 0; }
.notice.error { background: #fde8e8; color: #9b1c1c; }
.notice.warn { background: #fff4e5; color: #8a4b00; }
.results { display: grid; grid-template-columns: 1fr 1fr; gap: 24px; margin-top: 24px; }
.preview { width: 100%; height: 850px; border: 1px solid #ddd; background: #fff; }
.poster-png { display: block; max-width: 100%; border: 1px solid #ddd; }
.download { display: inline-block; margin-top: 8px; padding: 8px 16px; background: #ff4b4b; color: #fff; border-radius: 6px; text-decoration: none; }
footer { margin-top: 40px; font-size: 12px; color: #888; }
";

fn layout(body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "ChefArt" }
                style { (PreEscaped(STYLES)) }
            }
            body { (body) }
        }
    }
    .into_string()
}

fn form(values: &GenerateForm) -> Markup {
    let style = StylePreset::from_label(&values.style);
    let format = FormatSpec::from_label(&values.format);

    html! {
        form method="post" action="/generate" class="layout" {
            aside class="sidebar" {
                h3 { "Design Workspace" }
                label for="style" { "Style Pack" }
                select id="style" name="style" {
                    @for preset in StylePreset::ALL {
                        option value=(preset.label()) selected[preset == style] { (preset.label()) }
                    }
                }
                label { "Layout Format" }
                div class="radio" {
                    @for (i, choice) in FormatSpec::ALL.into_iter().enumerate() {
                        div {
                            input type="radio" name="format" id={ "format-" (i) } value=(choice.label())
                                checked[choice == format];
                            " "
                            label for={ "format-" (i) } { (choice.label()) }
                        }
                    }
                }
                hr;
                div class="toggle" {
                    input type="checkbox" id="generate_image" name="generate_image"
                        checked[values.generate_image.is_some()];
                    " "
                    label for="generate_image" { "Generate AI image" }
                }
            }
            div class="main" {
                h1 { "ChefArt" }
                p { "Turn a rough recipe into a shareable poster." }
                div class="fields" {
                    div {
                        label for="title" { "Dish name" }
                        input type="text" id="title" name="title" value=(values.title);
                        label for="ingredients" { "Ingredients" }
                        textarea id="ingredients" name="ingredients" { (values.ingredients) }
                    }
                    div {
                        label for="steps" { "How to cook" }
                        textarea id="steps" name="steps" { (values.steps) }
                        label for="tip" { "Secret tip" }
                        input type="text" id="tip" name="tip" value=(values.tip);
                    }
                }
                button type="submit" { "Generate 2 variations" }
            }
        }
    }
}

/// The input form, optionally with an error message above it.
pub fn form_page(values: &GenerateForm, error: Option<&str>) -> String {
    layout(html! {
        @if let Some(error) = error {
            div class="notice error" role="alert" { (error) }
        }
        (form(values))
        (footer())
    })
}

/// The form followed by both poster variants.
pub fn result_page(values: &GenerateForm, generation: &Generation) -> String {
    let job_id = generation.job_id.to_string();

    layout(html! {
        (form(values))
        div class="main" {
            h2 { (generation.recipe.title) }
            @if !generation.recipe.description.is_empty() {
                p { (generation.recipe.description) }
            }
            div class="results" {
                @for (i, outcome) in generation.variants.iter().enumerate() {
                    (variant(i, outcome, &job_id))
                }
            }
            (footer())
        }
    })
}

fn variant(index: usize, outcome: &VariantOutcome, job_id: &str) -> Markup {
    let doc = &outcome.document;
    let heading = if index == 0 {
        "Your pick"
    } else {
        "AI recommendation"
    };

    html! {
        section {
            h3 { "Option " (doc.variant_id) ": " (heading) }
            p { (doc.style.label()) " · " (doc.format.label()) }
            @match &outcome.png {
                Ok(_) => {
                    @let href = format!("/download/{}/{}", job_id, doc.variant_id);
                    img class="poster-png" src=(href) alt={ "Poster option " (doc.variant_id) };
                    a class="download" href=(href) {
                        "Download Option " (doc.variant_id)
                    }
                }
                Err(e) => {
                    iframe class="preview" title={ "Poster " (doc.variant_id) } srcdoc=(doc.html) {}
                    div class="notice warn" role="status" {
                        "PNG rendering unavailable: " (e.to_string())
                    }
                }
            }
        }
    }
}

fn footer() -> Markup {
    html! {
        footer { "ChefArt build " (BUILD_ID) }
    }
}
