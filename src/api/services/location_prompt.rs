use actix_web::{HttpResponse, Responder};
use tracing::trace;

/// Static geolocation prompt page.
///
/// Reads `flyerId`, `campaignId` and `redirectUrl` from the query string,
/// asks the browser for coordinates, posts them to `/api/update-location`
/// and then forwards the visitor to the real target. Declining or any
/// geolocation failure forwards immediately.
const LOCATION_PROMPT_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>One quick question</title>
<style>
  body { font-family: system-ui, sans-serif; display: flex; min-height: 100vh;
         align-items: center; justify-content: center; margin: 0; background: #f5f5f5; }
  .card { background: #fff; border-radius: 12px; padding: 2rem; max-width: 22rem;
          text-align: center; box-shadow: 0 2px 12px rgba(0,0,0,.08); }
  button { background: #2563eb; color: #fff; border: 0; border-radius: 8px;
           padding: .75rem 1.5rem; font-size: 1rem; cursor: pointer; }
  a.skip { display: block; margin-top: 1rem; color: #6b7280; font-size: .875rem; }
  .status { margin-top: 1rem; color: #6b7280; font-size: .875rem; min-height: 1.25rem; }
</style>
</head>
<body>
<div class="card">
  <h1>Where did you find this flyer?</h1>
  <p>Sharing the flyer's location helps the campaign know which spots work.
     It is only asked once per flyer.</p>
  <button id="share">Share location</button>
  <a class="skip" id="skip" href="#">Skip</a>
  <div class="status" id="status"></div>
</div>
<script>
(function () {
  var params = new URLSearchParams(window.location.search);
  var flyerId = params.get("flyerId");
  var campaignId = params.get("campaignId");
  var redirectUrl = params.get("redirectUrl") || "/";
  var status = document.getElementById("status");

  function go() { window.location.replace(redirectUrl); }

  document.getElementById("skip").addEventListener("click", function (e) {
    e.preventDefault();
    go();
  });

  document.getElementById("share").addEventListener("click", function () {
    if (!navigator.geolocation || !flyerId || !campaignId) { go(); return; }
    status.textContent = "Requesting location…";
    navigator.geolocation.getCurrentPosition(function (pos) {
      status.textContent = "Saving…";
      fetch("/api/update-location", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({
          flyerId: flyerId,
          campaignId: campaignId,
          lat: pos.coords.latitude,
          lng: pos.coords.longitude
        })
      }).finally(go);
    }, function () {
      go();
    }, { timeout: 30000, enableHighAccuracy: true });
  });
})();
</script>
</body>
</html>
"##;

/// `GET /location-prompt`
pub async fn location_prompt() -> impl Responder {
    trace!("Serving location prompt page");
    HttpResponse::Ok()
        .insert_header(("Content-Type", "text/html; charset=utf-8"))
        .insert_header(("Cache-Control", "no-store"))
        .body(LOCATION_PROMPT_HTML)
}
