//! Browser page rendering the scene with Leaflet.

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Pakistan</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
  <style>
    html, body { margin: 0; height: 100%; }
    #map { height: 100vh; width: 100%; }
    .city-icon div { font: 12px sans-serif; white-space: nowrap; }
    .province-icon div { font: bold 14px sans-serif; white-space: nowrap; color: #444; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script>
    fetch("/v1/scene")
      .then((r) => r.json())
      .then((scene) => {
        const map = L.map("map").setView(scene.center, scene.zoom);
        const tiles = L.tileLayer(scene.tile_url, { attribution: scene.attribution }).addTo(map);

        for (const m of scene.markers) {
          const icon = L.divIcon({ className: m.icon.class_name, html: m.icon.html });
          L.marker(m.position, { icon }).bindPopup(m.popup).addTo(map);
        }

        let masked = false;
        for (const layer of scene.layers) {
          if (layer.kind === "outline") {
            L.geoJSON(layer.data, { style: layer.style }).addTo(map);
          }
        }

        tiles.on("load", () => {
          if (masked) return;
          masked = true;
          if (scene.bounds) {
            map.fitBounds([scene.bounds.southwest, scene.bounds.northeast]);
          }
          for (const layer of scene.layers) {
            if (layer.kind === "mask") {
              L.geoJSON(layer.data, { style: layer.style, interactive: false }).addTo(map).bringToBack();
            }
          }
        });
      });
  </script>
</body>
</html>
"#;
