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


//! A standalone flashcard deck: one HTML file with the word list embedded and
//! a small stepper script.

use maud::DOCTYPE;
use maud::Markup;
use maud::PreEscaped;
use maud::html;

use crate::error::Fallible;

const DECK_STYLES: &str = "body { margin: 0; padding: 0; overflow: hidden; font-family: 'Assistant', 'Heebo', Arial, sans-serif; background-color: #1e40af; color: white; display: flex; flex-direction: column; height: 100vh; }
.card-container { flex: 1; display: flex; align-items: center; justify-content: center; text-align: center; padding: 20px; }
.word { font-size: 15vw; font-weight: 800; line-height: 1.2; text-shadow: 0 10px 30px rgba(0,0,0,0.3); animation: fadeIn 0.3s ease-out; }
@keyframes fadeIn { from { opacity: 0; transform: scale(0.95); } to { opacity: 1; transform: scale(1); } }
.controls { background: rgba(0,0,0,0.2); padding: 20px; display: flex; justify-content: center; gap: 40px; align-items: center; }
button { background: white; color: #1e40af; border: none; padding: 15px 30px; border-radius: 50px; font-weight: bold; cursor: pointer; font-size: 1.2rem; transition: all 0.2s; }
button:hover { transform: scale(1.05); background: #f8fafc; }
.counter { font-size: 1.2rem; font-weight: bold; min-width: 80px; text-align: center; }
.topic-header { position: absolute; top: 20px; right: 20px; font-size: 1rem; opacity: 0.6; }";

/// Left steps forward and right steps back, as the page reads right to left.
const DECK_SCRIPT: &str = "let index = 0;
const display = document.getElementById('wordDisplay');
const currEl = document.getElementById('curr');
document.getElementById('total').innerText = words.length;
function update() {
  display.innerText = words[index];
  currEl.innerText = index + 1;
  display.style.animation = 'none';
  display.offsetHeight;
  display.style.animation = null;
}
function next() { index = (index + 1) % words.length; update(); }
function prev() { index = (index - 1 + words.length) % words.length; update(); }
document.getElementById('next').addEventListener('click', next);
document.getElementById('prev').addEventListener('click', prev);
window.addEventListener('keydown', (e) => {
  if (e.key === 'ArrowLeft') next();
  if (e.key === 'ArrowRight') prev();
  if (e.key === ' ') next();
});
update();";

/// The word list as a script literal. `</` is escaped so a word cannot close
/// the script element.
fn words_literal(words: &[String]) -> Fallible<String> {
    Ok(serde_json::to_string(words)?.replace("</", "<\\/"))
}

/// Render the deck. Fails when there are no words.
pub fn render_deck(topic: &str, words: &[String], author: Option<&str>) -> Fallible<String> {
    if words.is_empty() {
        return crate::error::fail("אין מילים לייצוא");
    }
    let literal = words_literal(words)?;
    let page: Markup = html! {
        (DOCTYPE)
        html lang="he" dir="rtl" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "כרטיסי הברקה - " (topic) }
                style { (PreEscaped(DECK_STYLES)) }
            }
            body {
                div.topic-header {
                    (topic)
                    @if let Some(author) = author {
                        " | " (author)
                    }
                }
                div.card-container {
                    div #wordDisplay .word {}
                }
                div.controls {
                    button #prev { "קודם" }
                    div.counter {
                        span #curr { "1" } " / " span #total {}
                    }
                    button #next { "הבא" }
                }
                script {
                    (PreEscaped(format!("const words = {literal};\n{DECK_SCRIPT}")))
                }
            }
        }
    };
    Ok(page.into_string())
}
