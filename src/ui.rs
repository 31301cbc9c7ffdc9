use crate::models::Sensor;

pub fn render_surface_index(default_date: &str) -> String {
    SURFACE_HTML
        .replace("{{STYLE}}", SHARED_STYLE)
        .replace("{{DEFAULT_DATE}}", default_date)
}

pub fn render_series_index(sensor: Sensor) -> String {
    let (ibs, obs) = match sensor {
        Sensor::Ibs => ("checked", ""),
        Sensor::Obs => ("", "checked"),
    };
    SERIES_HTML
        .replace("{{STYLE}}", SHARED_STYLE)
        .replace("{{IBS_CHECKED}}", ibs)
        .replace("{{OBS_CHECKED}}", obs)
}

const SHARED_STYLE: &str = r#"
    :root {
      --bg: #f3f5f8;
      --ink: #1f2933;
      --muted: #65727e;
      --accent: #2f6f9f;
      --card: #ffffff;
      --shadow: 0 10px 30px rgba(31, 41, 51, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
      padding: 24px;
    }

    h1 {
      margin: 0 0 20px;
      font-size: 1.8rem;
    }

    .controls {
      background: var(--card);
      border-radius: 12px;
      box-shadow: var(--shadow);
      padding: 18px;
      margin-bottom: 20px;
      display: flex;
      flex-wrap: wrap;
      gap: 18px;
      align-items: flex-end;
    }

    .control {
      display: grid;
      gap: 6px;
    }

    label.title {
      font-weight: 600;
      color: var(--muted);
      font-size: 0.9rem;
    }

    .radios {
      display: flex;
      gap: 14px;
    }

    input[type="date"],
    input[type="number"],
    select {
      padding: 8px;
      border: 1px solid #cfd6dd;
      border-radius: 6px;
      font-size: 0.95rem;
    }

    select[multiple] {
      min-width: 220px;
      min-height: 140px;
    }

    button {
      border: none;
      border-radius: 6px;
      padding: 9px 18px;
      background: var(--accent);
      color: white;
      font-weight: 600;
      cursor: pointer;
    }

    .output {
      min-height: 1.4em;
      margin-bottom: 16px;
      font-size: 1rem;
    }

    .output[data-type="error"] {
      color: #b3261e;
    }

    .chart {
      background: var(--card);
      border-radius: 12px;
      box-shadow: var(--shadow);
      width: 100%;
      height: 800px;
    }
"#;

const SURFACE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Heater Profile Surface</title>
  <script src="https://cdn.plot.ly/plotly-2.27.0.min.js"></script>
  <style>{{STYLE}}</style>
</head>
<body>
  <h1>Data Visualization and Value Retrieval</h1>

  <section class="controls">
    <div class="control">
      <label class="title">Data</label>
      <div class="radios" id="data-type-radio">
        <label><input type="radio" name="data-type" value="real" /> Real Data</label>
        <label><input type="radio" name="data-type" value="pred" checked /> Predicted Data</label>
      </div>
    </div>
    <div class="control">
      <label class="title" for="date-input">Date:</label>
      <input id="date-input" type="date" value="{{DEFAULT_DATE}}" />
    </div>
    <div class="control">
      <label class="title" for="hp-time-bin">Heater profile time:</label>
      <input id="hp-time-bin" type="number" value="0" />
    </div>
    <button id="submit-val" type="button">Submit</button>
  </section>

  <div class="output" id="output-value"></div>
  <div class="chart" id="surface-plot"></div>

  <script>
    const chartEl = document.getElementById('surface-plot');
    const outputEl = document.getElementById('output-value');

    const selectedKind = () =>
      document.querySelector('input[name="data-type"]:checked').value;

    const setOutput = (message, type) => {
      outputEl.textContent = message;
      outputEl.dataset.type = type || '';
    };

    const loadSurface = async () => {
      const res = await fetch(`/api/surface?kind=${encodeURIComponent(selectedKind())}`);
      if (!res.ok) {
        throw new Error((await res.text()) || 'Unable to load figure');
      }
      const figure = await res.json();
      Plotly.react(chartEl, figure.data, figure.layout, { responsive: true });
    };

    const loadMeta = async () => {
      const res = await fetch('/api/surface/meta');
      if (!res.ok) {
        throw new Error('Unable to load dates');
      }
      const meta = await res.json();
      const dateEl = document.getElementById('date-input');
      const sorted = [...meta.dates].sort();
      if (sorted.length) {
        dateEl.min = sorted[0];
        dateEl.max = sorted[sorted.length - 1];
      }
      if (!dateEl.value && meta.default_date) {
        dateEl.value = meta.default_date;
      }
    };

    const submitLookup = async () => {
      const raw = document.getElementById('hp-time-bin').value;
      const res = await fetch('/api/lookup', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({
          kind: selectedKind(),
          date: document.getElementById('date-input').value,
          time_bin: raw === '' ? null : Number(raw)
        })
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Lookup failed');
      }
      const body = await res.json();
      setOutput(body.message, '');
    };

    document.querySelectorAll('input[name="data-type"]').forEach((input) => {
      input.addEventListener('change', () => {
        loadSurface().catch((err) => setOutput(err.message, 'error'));
      });
    });

    document.getElementById('submit-val').addEventListener('click', () => {
      submitLookup().catch((err) => setOutput(err.message, 'error'));
    });

    Promise.all([loadMeta(), loadSurface()]).catch((err) => setOutput(err.message, 'error'));
  </script>
</body>
</html>
"#;

const SERIES_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Heater Profile Time Series</title>
  <script src="https://cdn.plot.ly/plotly-2.27.0.min.js"></script>
  <style>{{STYLE}}</style>
</head>
<body>
  <h1>Observed vs. model-corrected field</h1>

  <section class="controls">
    <div class="control">
      <label class="title">Sensor</label>
      <div class="radios">
        <label><input type="radio" name="sensor" value="IBS" {{IBS_CHECKED}} /> IBS</label>
        <label><input type="radio" name="sensor" value="OBS" {{OBS_CHECKED}} /> OBS</label>
      </div>
    </div>
    <div class="control">
      <label class="title" for="date-select">Dates (Ctrl/Cmd+click for multiple)</label>
      <select id="date-select" multiple></select>
    </div>
  </section>

  <div class="output" id="status"></div>
  <div class="chart" id="series-plot"></div>

  <script>
    const chartEl = document.getElementById('series-plot');
    const selectEl = document.getElementById('date-select');
    const statusEl = document.getElementById('status');

    const selectedSensor = () =>
      document.querySelector('input[name="sensor"]:checked').value;

    const selectedDates = () =>
      Array.from(selectEl.selectedOptions).map((option) => option.value);

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const loadDates = async () => {
      const keep = new Set(selectedDates());
      const res = await fetch(`/api/series/dates?sensor=${selectedSensor()}`);
      if (!res.ok) {
        throw new Error((await res.text()) || 'Unable to load dates');
      }
      const body = await res.json();
      selectEl.innerHTML = body.dates
        .map((date) => `<option value="${date}" ${keep.has(date) ? 'selected' : ''}>${date}</option>`)
        .join('');
      setStatus(`${body.dates.length} dates for ${body.sensor}`, '');
    };

    const loadSeries = async () => {
      const dates = selectedDates();
      const params = new URLSearchParams({ sensor: selectedSensor(), dates: dates.join(',') });
      const res = await fetch(`/api/series?${params}`);
      if (!res.ok) {
        throw new Error((await res.text()) || 'Unable to load figure');
      }
      const figure = await res.json();
      Plotly.react(chartEl, figure.data, figure.layout, { responsive: true });
    };

    const refresh = async () => {
      await loadDates();
      await loadSeries();
    };

    document.querySelectorAll('input[name="sensor"]').forEach((input) => {
      input.addEventListener('change', () => {
        refresh().catch((err) => setStatus(err.message, 'error'));
      });
    });

    selectEl.addEventListener('change', () => {
      loadSeries().catch((err) => setStatus(err.message, 'error'));
    });

    refresh().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;
