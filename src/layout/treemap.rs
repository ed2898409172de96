use super::Rect;

/// Target aspect ratio for squarified rows.
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Squarified tiling of `values` (already sorted, largest first) inside
/// `rect`. Returns one rectangle per value, in the same order.
///
/// Rows are grown while the worst aspect ratio in the row does not get
/// worse; each finished row is laid along the shorter side of what is left.
pub(super) fn squarify(values: &[f64], rect: Rect, ratio: f64) -> Vec<Rect> {
    let n = values.len();
    let mut out = vec![Rect::default(); n];
    let Rect {
        mut x0,
        mut y0,
        x1,
        y1,
    } = rect;
    let mut remaining: f64 = values.iter().sum();

    let mut i0 = 0;
    let mut i1 = 0;
    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;

        // Seed the row with the next non-empty value.
        let mut sum;
        loop {
            sum = values[i1];
            i1 += 1;
            if sum != 0.0 || i1 >= n {
                break;
            }
        }
        let mut min_value = sum;
        let mut max_value = sum;
        let alpha = (dy / dx).max(dx / dy) / (remaining * ratio);
        let mut beta = sum * sum * alpha;
        let mut min_ratio = (max_value / beta).max(beta / min_value);

        while i1 < n {
            let value = values[i1];
            sum += value;
            min_value = min_value.min(value);
            max_value = max_value.max(value);
            beta = sum * sum * alpha;
            let new_ratio = (max_value / beta).max(beta / min_value);
            if new_ratio > min_ratio {
                sum -= value;
                break;
            }
            min_ratio = new_ratio;
            i1 += 1;
        }

        let last_row = i1 >= n || remaining - sum <= 0.0;
        if dx < dy {
            let row_end = if last_row || remaining <= 0.0 {
                y1
            } else {
                y0 + dy * sum / remaining
            };
            dice(&values[i0..i1], &mut out[i0..i1], Rect::new(x0, y0, x1, row_end), sum);
            y0 = row_end;
        } else {
            let row_end = if last_row || remaining <= 0.0 {
                x1
            } else {
                x0 + dx * sum / remaining
            };
            slice(&values[i0..i1], &mut out[i0..i1], Rect::new(x0, y0, row_end, y1), sum);
            x0 = row_end;
        }
        remaining -= sum;
        i0 = i1;
    }
    out
}

// Lays a row left to right across the full width of `rect`.
fn dice(values: &[f64], out: &mut [Rect], rect: Rect, total: f64) {
    let k = if total > 0.0 { rect.width() / total } else { 0.0 };
    let mut x = rect.x0;
    for (idx, (value, slot)) in values.iter().zip(out.iter_mut()).enumerate() {
        let end = if idx + 1 == values.len() && total > 0.0 {
            rect.x1
        } else {
            x + value * k
        };
        *slot = Rect::new(x, rect.y0, end, rect.y1);
        x = end;
    }
}

// Lays a row top to bottom across the full height of `rect`.
fn slice(values: &[f64], out: &mut [Rect], rect: Rect, total: f64) {
    let k = if total > 0.0 { rect.height() / total } else { 0.0 };
    let mut y = rect.y0;
    for (idx, (value, slot)) in values.iter().zip(out.iter_mut()).enumerate() {
        let end = if idx + 1 == values.len() && total > 0.0 {
            rect.y1
        } else {
            y + value * k
        };
        *slot = Rect::new(rect.x0, y, rect.x1, end);
        y = end;
    }
}
