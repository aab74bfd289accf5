// Copyright 2026 The lessonkit Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use maud::DOCTYPE;
use maud::Markup;
use maud::PreEscaped;
use maud::html;

/// Posts the chosen project file to `/import` and reloads.
const IMPORT_SCRIPT: &str = "document.getElementById('import-file').addEventListener('change', async (e) => {
  const file = e.target.files[0];
  if (!file) return;
  const response = await fetch('/import', { method: 'POST', body: await file.text() });
  if (!response.ok) alert('שגיאה בטעינת הקובץ.');
  window.location.reload();
});";

pub fn page_template(body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="he" dir="rtl" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "lessonkit" }
                link rel="stylesheet" href="/style.css";
            }
            body {
                (body)
                script { (PreEscaped(IMPORT_SCRIPT)) }
            }
        }
    }
}

/// A one-button form posting `action` to `/`.
pub fn action_button(action: &str, label: &str) -> Markup {
    html! {
        form.inline action="/" method="post" {
            input type="hidden" name="action" value=(action);
            input type="submit" value=(label);
        }
    }
}

/// A one-button form posting `action` with a `value` to `/`.
pub fn value_button(action: &str, value: &str, label: &str, class: &str) -> Markup {
    html! {
        form.inline action="/" method="post" {
            input type="hidden" name="action" value=(action);
            input type="hidden" name="value" value=(value);
            input class=(class) type="submit" value=(label);
        }
    }
}

/// A form posting a generation request. Disabled while the concern is busy.
pub fn generate_button(kind: &str, extra: Option<(&str, &str)>, label: &str, busy: bool) -> Markup {
    html! {
        form.inline action="/generate" method="post" {
            input type="hidden" name="kind" value=(kind);
            @if let Some((name, value)) = extra {
                input type="hidden" name=(name) value=(value);
            }
            @if busy {
                input.generate type="submit" value="בעבודה…" disabled;
            } @else {
                input.generate type="submit" value=(label);
            }
        }
    }
}
