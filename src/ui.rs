pub fn render_index(date: &str) -> String {
    INDEX_HTML.replace("{{DATE}}", date)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>うんこ管理アプリ</title>
  <style>
    :root {
      --bg-1: #f0f9f1;
      --bg-2: #e3f0fb;
      --ink: #2a2c2b;
      --accent: #3da35d;
      --accent-2: #b4452f;
      --card: #ffffff;
      --shadow: 0 10px 30px rgba(42, 72, 56, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg-1), var(--bg-2));
      color: var(--ink);
      font-family: "Hiragino Sans", "Noto Sans JP", sans-serif;
      display: grid;
      place-items: start center;
      padding: 24px 16px 48px;
    }

    .app {
      width: min(760px, 100%);
      display: grid;
      gap: 16px;
    }

    .card {
      background: var(--card);
      border-radius: 14px;
      box-shadow: var(--shadow);
      padding: 18px 20px;
    }

    h1 {
      margin: 0;
      font-size: 1.6rem;
    }

    h2 {
      margin: 0 0 10px;
      font-size: 1.05rem;
    }

    .muted {
      color: #6b6f6c;
      font-size: 0.85rem;
    }

    .row {
      display: flex;
      gap: 8px;
      flex-wrap: wrap;
      align-items: center;
    }

    input, select, textarea, button {
      font: inherit;
      border: 1px solid #c9d4cc;
      border-radius: 8px;
      padding: 7px 10px;
    }

    button {
      background: var(--accent);
      color: white;
      border: none;
      cursor: pointer;
    }

    button.secondary {
      background: #eef2ef;
      color: var(--ink);
    }

    button.danger {
      background: var(--accent-2);
    }

    .tabs button[aria-pressed="true"] {
      outline: 2px solid var(--accent);
    }

    .week {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 6px;
    }

    .day {
      border: 1px solid #dde5df;
      border-radius: 10px;
      min-height: 92px;
      padding: 6px;
      font-size: 0.78rem;
    }

    .day.today {
      border-color: var(--accent);
      border-width: 2px;
    }

    .entry {
      display: flex;
      justify-content: space-between;
      background: #f4f8f5;
      border-radius: 6px;
      padding: 2px 5px;
      margin-top: 4px;
    }

    .entry button {
      background: none;
      color: var(--accent-2);
      padding: 0 2px;
    }

    .stats-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(130px, 1fr));
      gap: 10px;
    }

    .stat {
      border: 1px solid #dde5df;
      border-radius: 10px;
      padding: 10px;
    }

    .stat .value {
      font-size: 1.4rem;
      font-weight: 600;
    }

    ul {
      margin: 0;
      padding-left: 1.2em;
    }
  </style>
</head>
<body>
  <div class="app">
    <div class="card">
      <h1>💩 うんこ管理アプリ</h1>
      <p class="muted">今日: {{DATE}}</p>
      <div class="row">
        <label for="user">ユーザーID</label>
        <input id="user" placeholder="user id" />
        <button id="load">読み込む</button>
      </div>
    </div>

    <div class="card">
      <h2>今週の健康状況</h2>
      <p id="message" class="muted">ユーザーIDを入力してください。</p>
    </div>

    <div class="card">
      <h2>週間カレンダー</h2>
      <div class="row" style="margin-bottom:8px">
        <button class="secondary" id="prev-week">←</button>
        <span id="week-label" class="muted"></span>
        <button class="secondary" id="next-week">→</button>
      </div>
      <div class="week" id="week"></div>
    </div>

    <div class="card">
      <h2>記録を追加</h2>
      <form id="add-form" class="row">
        <input type="date" id="date" required />
        <input type="time" id="time" step="60" required />
        <select id="shape">
          <option value="normal">💩 普通</option>
          <option value="hard">🪨 固い</option>
          <option value="soft">🍦 柔らかい</option>
          <option value="watery">💧 水様</option>
        </select>
        <input id="notes" placeholder="メモ" />
        <button type="submit">追加</button>
        <button type="button" class="danger" id="clear-all">全削除</button>
      </form>
    </div>

    <div class="card">
      <h2>統計レポート</h2>
      <div class="row tabs" id="period-tabs">
        <button class="secondary" data-period="week" aria-pressed="true">週間</button>
        <button class="secondary" data-period="month" aria-pressed="false">月間</button>
        <button class="secondary" data-period="year" aria-pressed="false">年間</button>
      </div>
      <p class="muted" id="period-label"></p>
      <div class="stats-grid" id="stats"></div>
      <h2 style="margin-top:14px">健康アドバイス</h2>
      <ul id="advice"></ul>
    </div>
  </div>

  <script>
    const ICONS = { normal: '💩', hard: '🪨', soft: '🍦', watery: '💧' };
    const state = {
      user: localStorage.getItem('stool-log-user') || '',
      period: 'week',
      selected: '{{DATE}}'
    };

    const el = (id) => document.getElementById(id);
    el('user').value = state.user;
    el('date').value = '{{DATE}}';

    const headers = () => ({
      'content-type': 'application/json',
      'x-user-id': state.user
    });

    const api = async (path, options = {}) => {
      const res = await fetch(path, { ...options, headers: headers() });
      if (!res.ok && res.status !== 204) {
        throw new Error(await res.text() || 'Request failed');
      }
      return res.status === 204 ? null : res.json();
    };

    const shiftDays = (iso, days) => {
      // Format from local components; an ISO rendering is UTC and walks
      // the date back a day east of Greenwich.
      const d = new Date(iso + 'T00:00:00');
      d.setDate(d.getDate() + days);
      const pad = (n) => String(n).padStart(2, '0');
      return `${d.getFullYear()}-${pad(d.getMonth() + 1)}-${pad(d.getDate())}`;
    };

    const renderCalendar = async () => {
      const cal = await api(`/api/calendar?view=week&selected=${state.selected}`);
      el('week-label').textContent = `${cal.days[0].date} 〜 ${cal.days[6].date}`;
      el('week').innerHTML = '';
      for (const day of cal.days) {
        const cell = document.createElement('div');
        cell.className = 'day' + (day.date === '{{DATE}}' ? ' today' : '');
        cell.innerHTML = `<span class="muted">${day.date.slice(5)}</span>`;
        for (const record of day.records) {
          const entry = document.createElement('div');
          entry.className = 'entry';
          entry.innerHTML = `<span>${ICONS[record.shape]} ${record.time}</span>`;
          const del = document.createElement('button');
          del.textContent = '×';
          del.onclick = () =>
            api(`/api/records/${record.id}`, { method: 'DELETE' })
              .then(refresh)
              .catch((err) => alert(err.message));
          entry.appendChild(del);
          cell.appendChild(entry);
        }
        el('week').appendChild(cell);
      }
    };

    const renderStats = async () => {
      const stats = await api(`/api/stats?period=${state.period}&date=${state.selected}`);
      el('period-label').textContent = `期間: ${stats.period.label}`;
      el('stats').innerHTML = `
        <div class="stat"><span class="muted">総記録数</span><div class="value">${stats.shape.total}</div></div>
        <div class="stat"><span class="muted">異常記録</span><div class="value">${stats.shape.abnormal_count}</div></div>
        <div class="stat"><span class="muted">正常率</span><div class="value">${stats.shape.normal_rate_pct}%</div></div>
        <div class="stat"><span class="muted">記録日数</span><div class="value">${stats.daily.days_with_records}日</div></div>
        <div class="stat"><span class="muted">1日平均</span><div class="value">${stats.daily.average_per_day}回</div></div>
        <div class="stat"><span class="muted">1日最大</span><div class="value">${stats.daily.max_per_day}回</div></div>`;
      el('advice').innerHTML = stats.advice
        .map((line) => `<li>${line}</li>`)
        .join('');
    };

    const renderMessage = async () => {
      const data = await api(`/api/health-message?date=${state.selected}`);
      el('message').textContent = data.message;
    };

    const refresh = () => {
      if (!state.user) return;
      return Promise.all([renderMessage(), renderCalendar(), renderStats()]).catch(
        (err) => { el('message').textContent = err.message; }
      );
    };

    el('load').addEventListener('click', () => {
      state.user = el('user').value.trim();
      localStorage.setItem('stool-log-user', state.user);
      refresh();
    });

    el('prev-week').addEventListener('click', () => {
      state.selected = shiftDays(state.selected, -7);
      refresh();
    });

    el('next-week').addEventListener('click', () => {
      state.selected = shiftDays(state.selected, 7);
      refresh();
    });

    document.querySelectorAll('#period-tabs button').forEach((button) => {
      button.addEventListener('click', () => {
        state.period = button.dataset.period;
        document
          .querySelectorAll('#period-tabs button')
          .forEach((b) => b.setAttribute('aria-pressed', String(b === button)));
        renderStats().catch((err) => alert(err.message));
      });
    });

    el('add-form').addEventListener('submit', (event) => {
      event.preventDefault();
      api('/api/records', {
        method: 'POST',
        body: JSON.stringify({
          date: el('date').value,
          time: el('time').value,
          shape: el('shape').value,
          notes: el('notes').value
        })
      })
        .then(() => { el('notes').value = ''; return refresh(); })
        .catch((err) => alert(err.message));
    });

    el('clear-all').addEventListener('click', () => {
      if (!confirm('すべてのデータを削除しますか？この操作は取り消せません。')) return;
      api('/api/records', { method: 'DELETE' })
        .then(refresh)
        .catch((err) => alert(err.message));
    });

    if (state.user) refresh();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_embeds_the_reference_date() {
        let page = render_index("2024-06-05");
        assert!(page.contains("今日: 2024-06-05"));
        assert!(!page.contains("{{DATE}}"));
    }

    #[test]
    fn week_navigation_date_math_stays_in_local_time() {
        // toISOString renders UTC; in any UTC+ timezone that turns a local
        // midnight back into the previous day, so week steps drift to 8 days.
        let page = render_index("2024-06-05");
        assert!(!page.contains("toISOString"));
        assert!(page.contains("getFullYear"));
    }
}
