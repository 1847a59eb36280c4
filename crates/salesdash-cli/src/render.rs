//! Self-contained HTML dashboard.
//!
//! The page is assembled with `writeln!` into a `String`. KPI cards and tables
//! are rendered server-side; charts are drawn client-side by Chart.js from the
//! snapshot embedded as JSON.

use std::fmt::Write;

use salesdash_metrics::channels::MIN_VOLUME_CHANNELS;
use salesdash_metrics::MetricsSnapshot;

const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js";

/// Above this share of prospects without a channel, the channel panel shows
/// a warning.
const MISSING_CHANNEL_WARNING: u32 = 70;

const STYLES: &str = r"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f5f5f5; padding: 20px; }
    .dashboard { max-width: 1400px; margin: 0 auto; }
    .header { background: white; padding: 30px; border-radius: 12px; margin-bottom: 30px; box-shadow: 0 2px 10px rgba(0,0,0,0.05); }
    h1 { color: #1a1a1a; font-size: 32px; margin-bottom: 10px; }
    .last-update { color: #666; font-size: 14px; }
    .kpi-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(250px, 1fr)); gap: 20px; margin-bottom: 30px; }
    .kpi-card { background: white; padding: 25px; border-radius: 12px; box-shadow: 0 2px 10px rgba(0,0,0,0.05); }
    .kpi-value { font-size: 36px; font-weight: bold; margin: 10px 0; }
    .kpi-label { color: #666; font-size: 14px; text-transform: uppercase; letter-spacing: 0.5px; }
    .kpi-sublabel { color: #999; font-size: 12px; margin-top: 5px; }
    .positive { color: #10b981; }
    .negative { color: #ef4444; }
    .neutral { color: #3b82f6; }
    .warning { color: #f59e0b; }
    .chart-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(500px, 1fr)); gap: 20px; margin-bottom: 30px; }
    .chart-container { background: white; padding: 25px; border-radius: 12px; box-shadow: 0 2px 10px rgba(0,0,0,0.05); }
    .chart-title { font-size: 18px; font-weight: 600; margin-bottom: 20px; color: #1a1a1a; }
    canvas { max-height: 300px; }
    .progress-bar { width: 100%; height: 8px; background: #e5e5e5; border-radius: 4px; overflow: hidden; margin-top: 10px; }
    .progress-fill { height: 100%; background: linear-gradient(90deg, #3b82f6 0%, #10b981 100%); }
    .data-table { background: white; padding: 25px; border-radius: 12px; box-shadow: 0 2px 10px rgba(0,0,0,0.05); }
    table { width: 100%; border-collapse: collapse; }
    th, td { padding: 12px; text-align: left; border-bottom: 1px solid #e5e5e5; }
    th { font-weight: 600; color: #666; font-size: 14px; }
    .no-data { text-align: center; color: #999; padding: 40px; }
    .warning-box { background: #fef3c7; border: 1px solid #f59e0b; border-radius: 8px; padding: 15px; margin-bottom: 20px; }
    .warning-box p { color: #92400e; margin: 0; }
    .simple-stats { display: flex; flex-direction: column; gap: 10px; }
    .stat-item { padding: 12px; background: #f3f4f6; border-radius: 8px; }
    .stat-header { display: flex; justify-content: space-between; margin-bottom: 5px; }
    .stat-detail { font-size: 14px; color: #666; }
";

const CHART_SCRIPT: &str = r"
    Chart.defaults.font.family = '-apple-system, BlinkMacSystemFont, \'Segoe UI\', Roboto, sans-serif';
    const countAxis = { beginAtZero: true, ticks: { precision: 0 } };

    new Chart(document.getElementById('statusChart'), {
      type: 'doughnut',
      data: {
        labels: ['Succès', 'Échecs', 'Sans réponse', 'En cours'],
        datasets: [{
          data: statusSplit,
          backgroundColor: ['#10b981', '#ef4444', '#f59e0b', '#3b82f6'],
          borderWidth: 0
        }]
      },
      options: {
        responsive: true,
        maintainAspectRatio: false,
        plugins: {
          legend: { position: 'bottom' },
          tooltip: { callbacks: { label: (c) => c.label + ': ' + c.parsed + '%' } }
        }
      }
    });

    new Chart(document.getElementById('venueChart'), {
      type: 'bar',
      data: {
        labels: kpis.venueStats.map(v => v.venue),
        datasets: [
          { label: 'Total demandes', data: kpis.venueStats.map(v => v.total), backgroundColor: '#3b82f6' },
          { label: 'Contrats signés', data: kpis.venueStats.map(v => v.success), backgroundColor: '#10b981' }
        ]
      },
      options: { responsive: true, maintainAspectRatio: false, scales: { y: countAxis } }
    });

    new Chart(document.getElementById('monthlyChart'), {
      type: 'line',
      data: {
        labels: kpis.monthlyTrend.map(m => m.month),
        datasets: [{
          label: 'Nombre de demandes',
          data: kpis.monthlyTrend.map(m => m.count),
          borderColor: '#3b82f6',
          backgroundColor: 'rgba(59, 130, 246, 0.1)',
          tension: 0.4
        }]
      },
      options: { responsive: true, maintainAspectRatio: false, scales: { y: countAxis } }
    });

    new Chart(document.getElementById('pipelineChart'), {
      type: 'bar',
      data: {
        labels: kpis.pipeline.map(p => p.label),
        datasets: [{
          label: 'Prospects',
          data: kpis.pipeline.map(p => p.count),
          backgroundColor: '#8b5cf6'
        }]
      },
      options: {
        responsive: true,
        maintainAspectRatio: false,
        scales: { y: countAxis },
        plugins: {
          tooltip: {
            callbacks: {
              afterLabel: (c) => 'Montant HT: ' + Number(kpis.pipeline[c.dataIndex].totalPrice).toLocaleString('fr-FR') + '€'
            }
          }
        }
      }
    });

    const channelCanvas = document.getElementById('channelChart');
    if (channelCanvas) {
      new Chart(channelCanvas, {
        type: 'bar',
        data: {
          labels: kpis.topChannels.map(c => c.channel + ' (' + c.rate + '%)'),
          datasets: [{
            label: 'Conversions',
            data: kpis.topChannels.map(c => c.conversions),
            backgroundColor: ['#10b981', '#3b82f6', '#8b5cf6', '#f59e0b', '#ef4444']
          }]
        },
        options: {
          responsive: true,
          maintainAspectRatio: false,
          indexAxis: 'y',
          scales: { x: countAxis },
          plugins: {
            tooltip: {
              callbacks: {
                afterLabel: (c) => {
                  const stats = kpis.topChannels[c.dataIndex];
                  return 'Taux de conversion: ' + stats.rate + '%\nTotal prospects: ' + stats.total;
                }
              }
            }
          }
        }
      });
    }
";

/// Render the full dashboard page for `snapshot`.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be serialized for the chart script.
pub(crate) fn render_dashboard(snapshot: &MetricsSnapshot) -> Result<String, serde_json::Error> {
    let data = embedded_json(snapshot)?;
    let mut html = String::with_capacity(16 * 1024);

    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html lang=\"fr\">");
    let _ = writeln!(html, "<head>");
    let _ = writeln!(html, "  <meta charset=\"UTF-8\">");
    let _ = writeln!(
        html,
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
    );
    let _ = writeln!(
        html,
        "  <title>Dashboard Commercial - {}</title>",
        escape_html(&snapshot.last_update)
    );
    let _ = writeln!(html, "  <script src=\"{CHART_JS_CDN}\"></script>");
    let _ = writeln!(html, "  <style>{STYLES}  </style>");
    let _ = writeln!(html, "</head>");
    let _ = writeln!(html, "<body>");
    let _ = writeln!(html, "<div class=\"dashboard\">");

    write_header(&mut html, snapshot);
    write_kpi_cards(&mut html, snapshot);
    write_charts(&mut html, snapshot);
    write_refusals(&mut html, snapshot);

    let _ = writeln!(html, "</div>");
    let _ = writeln!(html, "<script>");
    let _ = writeln!(html, "    const kpis = {data};");
    let _ = writeln!(
        html,
        "    const statusSplit = [{}, {}, {}, {}];",
        snapshot.success_rate,
        snapshot.failure_rate,
        snapshot.no_response_rate,
        snapshot.in_progress_rate()
    );
    let _ = writeln!(html, "{CHART_SCRIPT}</script>");
    let _ = writeln!(html, "</body>");
    let _ = writeln!(html, "</html>");

    Ok(html)
}

fn write_header(html: &mut String, snapshot: &MetricsSnapshot) {
    let _ = writeln!(html, "<div class=\"header\">");
    let _ = writeln!(html, "  <h1>📊 Dashboard Commercial</h1>");
    let _ = writeln!(
        html,
        "  <div class=\"last-update\">Dernière mise à jour: {}</div>",
        escape_html(&snapshot.last_update)
    );
    let _ = writeln!(html, "</div>");
}

fn write_kpi_cards(html: &mut String, snapshot: &MetricsSnapshot) {
    let _ = writeln!(html, "<div class=\"kpi-grid\">");

    let _ = writeln!(html, "  <div class=\"kpi-card\">");
    let _ = writeln!(html, "    <div class=\"kpi-label\">Taux de Réussite</div>");
    let _ = writeln!(
        html,
        "    <div class=\"kpi-value {}\">{}%</div>",
        success_band(snapshot.success_rate),
        snapshot.success_rate
    );
    let _ = writeln!(
        html,
        "    <div class=\"progress-bar\"><div class=\"progress-fill\" style=\"width: {}%\"></div></div>",
        snapshot.success_rate.min(100)
    );
    let _ = writeln!(html, "  </div>");

    kpi_card(
        html,
        "Nombre d'Appels Moyen",
        "neutral",
        &format!("{:.1}", snapshot.avg_calls),
        "Par prospect contacté",
    );
    kpi_card(
        html,
        "Tarif Moyen",
        "neutral",
        &format!("{}€", group_thousands(snapshot.avg_price)),
        "HT par contrat signé",
    );
    kpi_card(
        html,
        "Total Prospects",
        "",
        &snapshot.total.to_string(),
        "Dans la base",
    );
    kpi_card(
        html,
        "Taux \"Prix trop cher\"",
        too_expensive_band(snapshot.too_expensive_rate),
        &format!("{}%", snapshot.too_expensive_rate),
        "Des refus",
    );
    kpi_card(
        html,
        "Sans Réponse",
        "warning",
        &format!("{}%", snapshot.no_response_rate),
        "Des prospects",
    );

    let _ = writeln!(html, "</div>");
}

fn kpi_card(html: &mut String, label: &str, band: &str, value: &str, sublabel: &str) {
    let class = if band.is_empty() {
        "kpi-value".to_string()
    } else {
        format!("kpi-value {band}")
    };
    let _ = writeln!(html, "  <div class=\"kpi-card\">");
    let _ = writeln!(html, "    <div class=\"kpi-label\">{}</div>", escape_html(label));
    let _ = writeln!(html, "    <div class=\"{class}\">{}</div>", escape_html(value));
    let _ = writeln!(
        html,
        "    <div class=\"kpi-sublabel\">{}</div>",
        escape_html(sublabel)
    );
    let _ = writeln!(html, "  </div>");
}

fn write_charts(html: &mut String, snapshot: &MetricsSnapshot) {
    let _ = writeln!(html, "<div class=\"chart-grid\">");
    chart_panel(html, "📈 Répartition des Statuts", "statusChart");
    chart_panel(html, "📍 Performance par Lieu", "venueChart");
    chart_panel(html, "📅 Évolution Mensuelle", "monthlyChart");

    let _ = writeln!(html, "  <div class=\"chart-container\">");
    let _ = writeln!(html, "    <h3 class=\"chart-title\">🎯 Canaux d'Acquisition</h3>");
    if snapshot.missing_channel_rate > MISSING_CHANNEL_WARNING {
        let _ = writeln!(
            html,
            "    <div class=\"warning-box\"><p>⚠️ {}% des prospects n'ont pas de canal renseigné</p></div>",
            snapshot.missing_channel_rate
        );
    }
    write_channel_body(html, snapshot);
    let _ = writeln!(html, "  </div>");

    chart_panel(html, "🔻 Pipeline Commercial", "pipelineChart");
    let _ = writeln!(html, "</div>");
}

fn chart_panel(html: &mut String, title: &str, canvas_id: &str) {
    let _ = writeln!(html, "  <div class=\"chart-container\">");
    let _ = writeln!(html, "    <h3 class=\"chart-title\">{}</h3>", escape_html(title));
    let _ = writeln!(html, "    <canvas id=\"{canvas_id}\"></canvas>");
    let _ = writeln!(html, "  </div>");
}

/// Chart when the ranking is long enough, otherwise a plain list of every
/// converting channel, otherwise a hint.
fn write_channel_body(html: &mut String, snapshot: &MetricsSnapshot) {
    if snapshot.top_channels.len() >= MIN_VOLUME_CHANNELS {
        let _ = writeln!(html, "    <canvas id=\"channelChart\"></canvas>");
        return;
    }

    let mut converting: Vec<_> = snapshot
        .channel_stats
        .iter()
        .filter(|s| s.conversions > 0)
        .collect();
    if converting.is_empty() {
        let _ = writeln!(
            html,
            "    <div class=\"no-data\">Aucune conversion enregistrée par canal. Vérifiez que le champ \"Canal d'acquisition\" est bien renseigné dans vos prospects.</div>"
        );
        return;
    }
    converting.sort_by(|a, b| {
        b.conversions
            .cmp(&a.conversions)
            .then_with(|| a.channel.cmp(&b.channel))
    });

    let _ = writeln!(html, "    <div class=\"simple-stats\">");
    for stats in converting {
        let plural = if stats.conversions > 1 { "s" } else { "" };
        let _ = writeln!(html, "      <div class=\"stat-item\">");
        let _ = writeln!(
            html,
            "        <div class=\"stat-header\"><strong>{}</strong><span class=\"positive\">{} conversion{plural}</span></div>",
            escape_html(&stats.channel),
            stats.conversions
        );
        let _ = writeln!(
            html,
            "        <div class=\"stat-detail\">Taux: {}% ({}/{})</div>",
            stats.rate, stats.conversions, stats.total
        );
        let _ = writeln!(html, "      </div>");
    }
    let _ = writeln!(html, "    </div>");
}

fn write_refusals(html: &mut String, snapshot: &MetricsSnapshot) {
    if snapshot.refusal_reasons.is_empty() {
        return;
    }

    let _ = writeln!(html, "<div class=\"data-table\">");
    let _ = writeln!(html, "  <h3 class=\"chart-title\">📋 Analyse des Refus</h3>");
    let _ = writeln!(html, "  <table>");
    let _ = writeln!(
        html,
        "    <thead><tr><th>Raison</th><th>Nombre</th><th>Pourcentage</th></tr></thead>"
    );
    let _ = writeln!(html, "    <tbody>");
    for reason in &snapshot.refusal_reasons {
        let _ = writeln!(
            html,
            "      <tr><td>{}</td><td>{}</td><td>{}%</td></tr>",
            escape_html(&reason.reason),
            reason.count,
            reason.share
        );
    }
    let _ = writeln!(html, "    </tbody>");
    let _ = writeln!(
        html,
        "    <tfoot><tr><th>Total</th><th>{}</th><th>100%</th></tr></tfoot>",
        snapshot.total_refusals()
    );
    let _ = writeln!(html, "  </table>");
    let _ = writeln!(html, "</div>");
}

fn success_band(rate: u32) -> &'static str {
    match rate {
        51.. => "positive",
        31..=50 => "warning",
        _ => "negative",
    }
}

fn too_expensive_band(rate: u32) -> &'static str {
    match rate {
        51.. => "negative",
        31..=50 => "warning",
        _ => "positive",
    }
}

/// Serializes the snapshot for a `<script>` block. `</` is escaped so label
/// text cannot close the script element early.
fn embedded_json(snapshot: &MetricsSnapshot) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(snapshot)?.replace("</", "<\\/"))
}

/// Groups digits in threes with a narrow no-break space, as French locales do.
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{202f}');
        }
        grouped.push(ch);
    }
    grouped
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
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
