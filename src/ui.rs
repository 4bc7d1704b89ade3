use crate::models::{LimitStatus, Record, RecordKind, Snapshot};

pub fn render_index(summary: &Snapshot) -> String {
    let status = match summary.status {
        LimitStatus::Under => "under",
        LimitStatus::Over => "over",
    };
    INDEX_HTML
        .replace("{{LIMIT}}", &summary.calorie_limit.to_string())
        .replace("{{TOTAL}}", &summary.total_calories.to_string())
        .replace("{{CONSUMED}}", &summary.consumed.to_string())
        .replace("{{BURNED}}", &summary.burned.to_string())
        .replace("{{REMAINING}}", &summary.remaining.to_string())
        .replace("{{PROGRESS}}", &format!("{:.1}", summary.progress_percentage))
        .replace("{{STATUS}}", status)
        .replace("{{WORKOUT_ITEMS}}", &render_items(&summary.workouts, RecordKind::Workout))
        .replace("{{MEAL_ITEMS}}", &render_items(&summary.meals, RecordKind::Meal))
}

fn render_items(records: &[Record], kind: RecordKind) -> String {
    let path = match kind {
        RecordKind::Meal => "meals",
        RecordKind::Workout => "workouts",
    };
    records
        .iter()
        .map(|record| {
            format!(
                r#"<li class="item {kind}" data-id="{id}" data-name="{name}">
          <span class="item-name">{name}</span>
          <span class="item-calories">{calories}</span>
          <form class="delete-form" method="post" action="/{path}/{id}/delete">
            <button class="btn-delete" type="submit" aria-label="Delete">&times;</button>
          </form>
        </li>"#,
                kind = kind.as_str(),
                id = record.id,
                name = escape_html(&record.name),
                calories = record.calories,
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '{' => escaped.push_str("&#123;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Calorie Tracker</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --ink: #2b2a28;
      --meal: #2f6f9f;
      --workout: #6b645d;
      --ok: #2d7a4b;
      --danger: #c63b2b;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 14px;
    }

    .stat {
      background: white;
      border-radius: 16px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 6px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 600;
    }

    .over .stat.remaining {
      background: #fbe3df;
    }

    .progress {
      height: 18px;
      border-radius: 999px;
      background: rgba(47, 72, 88, 0.1);
      overflow: hidden;
    }

    .progress-bar {
      height: 100%;
      background: var(--ok);
    }

    .over .progress-bar {
      background: var(--danger);
    }

    .columns {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
      gap: 20px;
    }

    .column {
      display: grid;
      gap: 12px;
      align-content: start;
    }

    .column h2 {
      margin: 0;
      font-size: 1.3rem;
    }

    form.add-form {
      display: grid;
      grid-template-columns: 1fr 110px auto;
      gap: 8px;
    }

    input {
      border: 1px solid rgba(47, 72, 88, 0.2);
      border-radius: 10px;
      padding: 10px 12px;
      font-size: 0.95rem;
    }

    button {
      border: none;
      border-radius: 10px;
      padding: 10px 16px;
      font-weight: 600;
      cursor: pointer;
      color: white;
      background: var(--meal);
    }

    .workouts button {
      background: var(--workout);
    }

    ul.items {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 8px;
    }

    .item {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 10px;
      background: white;
      border-radius: 12px;
      padding: 10px 14px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .item-name {
      flex: 1;
    }

    .item-calories {
      font-weight: 600;
      color: white;
      border-radius: 8px;
      padding: 4px 12px;
    }

    .item.meal .item-calories {
      background: var(--meal);
    }

    .item.workout .item-calories {
      background: var(--workout);
    }

    .item button.btn-delete {
      background: var(--danger);
      padding: 4px 10px;
    }

    .toolbar {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
    }

    .toolbar form {
      display: flex;
      gap: 8px;
    }

    .toolbar .btn-reset {
      background: var(--danger);
    }
  </style>
</head>
<body>
  <main class="app {{STATUS}}">
    <header>
      <h1>Calorie Tracker</h1>
      <div class="toolbar">
        <form id="limit-form" method="post" action="/limit">
          <input id="limit" name="limit" type="number" placeholder="{{LIMIT}}" aria-label="Daily limit" />
          <button type="submit">Set limit</button>
        </form>
        <form id="reset-form" method="post" action="/reset">
          <button class="btn-reset" type="submit">Reset day</button>
        </form>
      </div>
    </header>

    <section class="panel">
      <div class="stat">
        <span class="label">Daily limit</span>
        <span id="calories-limit" class="value">{{LIMIT}}</span>
      </div>
      <div class="stat">
        <span class="label">Net calories</span>
        <span id="calories-total" class="value">{{TOTAL}}</span>
      </div>
      <div class="stat">
        <span class="label">Consumed</span>
        <span id="calories-consumed" class="value">{{CONSUMED}}</span>
      </div>
      <div class="stat">
        <span class="label">Burned</span>
        <span id="calories-burned" class="value">{{BURNED}}</span>
      </div>
      <div class="stat remaining">
        <span class="label">Remaining</span>
        <span id="calories-remaining" class="value">{{REMAINING}}</span>
      </div>
    </section>

    <div class="progress" role="progressbar" aria-valuemin="0" aria-valuemax="100" aria-valuenow="{{PROGRESS}}">
      <div id="calorie-progress" class="progress-bar" style="width: {{PROGRESS}}%"></div>
    </div>

    <section class="columns">
      <div class="column meals">
        <h2>Meals</h2>
        <form class="add-form" id="meal-form" method="post" action="/meals">
          <input name="name" placeholder="Meal" required />
          <input name="calories" type="number" min="0" placeholder="Calories" required />
          <button type="submit">Add</button>
        </form>
        <input class="filter" id="filter-meals" data-target="meal-items" placeholder="Filter meals" />
        <ul class="items" id="meal-items">
        {{MEAL_ITEMS}}
        </ul>
      </div>
      <div class="column workouts">
        <h2>Workouts</h2>
        <form class="add-form" id="workout-form" method="post" action="/workouts">
          <input name="name" placeholder="Workout" required />
          <input name="calories" type="number" min="0" placeholder="Calories" required />
          <button type="submit">Add</button>
        </form>
        <input class="filter" id="filter-workouts" data-target="workout-items" placeholder="Filter workouts" />
        <ul class="items" id="workout-items">
        {{WORKOUT_ITEMS}}
        </ul>
      </div>
    </section>
  </main>

  <script>
    document.querySelectorAll('.filter').forEach((input) => {
      input.addEventListener('keyup', () => {
        const text = input.value.toLowerCase();
        document.querySelectorAll(`#${input.dataset.target} .item`).forEach((item) => {
          const name = item.dataset.name.toLowerCase();
          item.style.display = name.includes(text) ? '' : 'none';
        });
      });
    });

    document.querySelectorAll('.delete-form').forEach((form) => {
      form.addEventListener('submit', (event) => {
        if (!confirm('Delete this?')) {
          event.preventDefault();
        }
      });
    });

    document.getElementById('reset-form').addEventListener('submit', (event) => {
      if (!confirm('Reset the day?')) {
        event.preventDefault();
      }
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;

    #[test]
    fn renders_totals_and_items() {
        let mut ledger = Ledger::new(2000);
        let meal = Record::meal("Lunch", 500);
        let meal_id = meal.id;
        ledger.add_meal(meal);
        ledger.add_workout(Record::workout("Cycling", 200));

        let html = render_index(&Snapshot::from(&ledger));

        assert!(html.contains(r#"<span id="calories-total" class="value">300</span>"#));
        assert!(html.contains(r#"<span id="calories-remaining" class="value">1700</span>"#));
        assert!(html.contains("width: 15.0%"));
        assert!(html.contains(&format!(r#"action="/meals/{meal_id}/delete""#)));
        assert!(html.contains(r#"<main class="app under">"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn over_limit_marks_the_page() {
        let mut ledger = Ledger::new(100);
        ledger.add_meal(Record::meal("Cake", 450));

        let html = render_index(&Snapshot::from(&ledger));
        assert!(html.contains(r#"<main class="app over">"#));
        assert!(html.contains("width: 100.0%"));
    }

    #[test]
    fn names_are_escaped() {
        let mut ledger = Ledger::new(2000);
        ledger.add_meal(Record::meal("<b>Fish & \"chips\"</b> {{TOTAL}}", 700));

        let html = render_index(&Snapshot::from(&ledger));
        assert!(html.contains("&lt;b&gt;Fish &amp; &quot;chips&quot;&lt;/b&gt; &#123;&#123;TOTAL}}"));
        assert!(!html.contains("<b>Fish"));
    }
}
