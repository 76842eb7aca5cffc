//! Leaflet page renderer for a [`MapScene`].
//!
//! The page template is a `&'static str` with placeholders; the scene is
//! embedded as JSON and drawn by a small Leaflet bootstrap script.

use crate::map::MapScene;

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  {{RELOAD}}
  <title>{{TITLE}}</title>
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous"></script>
  <style>
    body { margin: 0; font-family: system-ui, sans-serif; background: #0f172a; color: #e2e8f0; }
    header { padding: 12px 16px; display: flex; gap: 12px; align-items: center; flex-wrap: wrap; }
    header h1 { font-size: 18px; margin: 0 12px 0 0; }
    #map { height: calc(100vh - 150px); }
    .action { background: #1e293b; border: 1px solid #334155; border-radius: 6px; padding: 6px 10px; }
    .action code { color: #38bdf8; }
    .status { padding: 8px 16px; }
    .status-normal { color: #e2e8f0; }
    .status-loading { color: #facc15; }
    .status-success { color: #4ade80; }
    .status-error { color: #fb7185; }
    footer { padding: 0 16px 8px; font-size: 12px; color: #94a3b8; }
  </style>
</head>
<body>
  <header>
    <h1>{{TITLE}}</h1>
    <div id="actions"></div>
  </header>
  <div id="status"></div>
  <div id="map"></div>
  <footer>Tracking data is simulated; positions drift randomly on each refresh.</footer>
  <script id="scene" type="application/json">{{SCENE_JSON}}</script>
  <script>
    const scene = JSON.parse(document.getElementById('scene').textContent);

    const status = document.getElementById('status');
    status.className = scene.status.css_class;
    status.textContent = scene.status.message;

    const actions = document.getElementById('actions');
    for (const action of scene.actions) {
      const el = document.createElement('span');
      el.className = 'action';
      el.innerHTML = `${action.label} <code></code>`;
      el.querySelector('code').textContent = action.command;
      actions.appendChild(el);
    }

    const popupHtml = (popup) => {
      const root = document.createElement('div');
      const title = document.createElement('strong');
      title.textContent = popup.title;
      root.appendChild(title);
      for (const line of popup.lines) {
        root.appendChild(document.createElement('br'));
        root.appendChild(document.createTextNode(line));
      }
      return root;
    };

    const center = [scene.camera.center.lat, scene.camera.center.lon];
    const map = L.map('map').setView(center, scene.camera.zoom);
    L.tileLayer(scene.tiles.url_template, { attribution: scene.tiles.attribution }).addTo(map);

    const icon = L.icon({
      iconUrl: scene.marker.icon.url,
      iconSize: scene.marker.icon.size_px,
      iconAnchor: [scene.marker.icon.size_px[0] / 2, scene.marker.icon.size_px[1]],
      popupAnchor: [0, -scene.marker.icon.size_px[1]],
    });
    L.marker([scene.marker.position.lat, scene.marker.position.lon], { icon })
      .addTo(map)
      .bindPopup(popupHtml(scene.marker.popup));

    if (scene.accuracy_circle) {
      const circle = scene.accuracy_circle;
      L.circle([circle.center.lat, circle.center.lon], {
        radius: circle.radius_m,
        color: circle.style.color,
        fillColor: circle.style.fill_color,
        fillOpacity: circle.style.fill_opacity,
      }).addTo(map).bindPopup(popupHtml(circle.popup));
    }

    map.flyTo(center, scene.camera.zoom);
  </script>
</body>
</html>
"#;

/// Render a self-contained Leaflet page for the scene.
/// `reload_secs` adds a meta refresh so a page left open follows a driver
/// that keeps rewriting the file.
pub fn render_page(scene: &MapScene, reload_secs: Option<u32>) -> Result<String, serde_json::Error> {
    let scene_json = serde_json::to_string(scene)?;
    let reload = match reload_secs {
        Some(secs) if secs > 0 => format!(r#"<meta http-equiv="refresh" content="{}" />"#, secs),
        _ => String::new(),
    };

    Ok(PAGE_TEMPLATE
        .replace("{{RELOAD}}", &reload)
        .replace("{{TITLE}}", &escape_html(&scene.title))
        .replace("{{SCENE_JSON}}", &escape_script_json(&scene_json)))
}

/// Escape text for HTML element content
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// JSON inside a <script> block must not close the element early
fn escape_script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}
