//! Synthetic street grid over Ba Đình, Hà Nội.
//!
//! Five east–west streets crossed by five north–south streets, ~330 m
//! apart, covering Ba Đình Square and the blocks north towards Quán Thánh.
//! Weights are street lengths in metres.

use rn_core::{GeoPoint, NodeId};
use rn_network::{NetworkResult, RoadNetwork, RoadNetworkBuilder};

pub const ROWS: usize = 5;
pub const COLS: usize = 5;

const SOUTH_WEST: (f64, f64) = (21.0300, 105.8300);
const SPACING_DEG: f64 = 0.003;

pub const BA_DINH_SQUARE:    GeoPoint = GeoPoint { lat: 21.0368, lon: 105.8347 };
pub const QUAN_THANH_TEMPLE: GeoPoint = GeoPoint { lat: 21.0430, lon: 105.8365 };

pub struct District {
    pub network: RoadNetwork,
    /// `grid[row][col]`, row 0 southmost, col 0 westmost.
    pub grid:    Vec<Vec<NodeId>>,
}

impl District {
    pub fn corner_sw(&self) -> NodeId {
        self.grid[0][0]
    }

    pub fn corner_ne(&self) -> NodeId {
        self.grid[ROWS - 1][COLS - 1]
    }

    pub fn centre(&self) -> NodeId {
        self.grid[ROWS / 2][COLS / 2]
    }
}

pub fn build_district() -> NetworkResult<District> {
    let mut b = RoadNetworkBuilder::with_capacity(ROWS * COLS, 4 * ROWS * COLS);

    let grid: Vec<Vec<NodeId>> = (0..ROWS)
        .map(|r| {
            (0..COLS)
                .map(|c| {
                    b.add_node(GeoPoint::new(
                        SOUTH_WEST.0 + r as f64 * SPACING_DEG,
                        SOUTH_WEST.1 + c as f64 * SPACING_DEG,
                    ))
                })
                .collect()
        })
        .collect();

    for r in 0..ROWS {
        for c in 0..COLS {
            let here = grid[r][c];
            if c + 1 < COLS {
                let east = grid[r][c + 1];
                let len = b.node_pos(here).distance_m(b.node_pos(east));
                if r == ROWS - 1 {
                    // Northmost street is one-way eastbound.
                    b.add_directed_edge(here, east, len);
                } else {
                    b.add_road(here, east, len);
                }
            }
            if r + 1 < ROWS {
                let north = grid[r + 1][c];
                let len = b.node_pos(here).distance_m(b.node_pos(north));
                b.add_road(here, north, len);
            }
        }
    }

    // Slow service lane alongside the central north–south street.
    let (s, n) = (grid[1][COLS / 2], grid[2][COLS / 2]);
    let len = b.node_pos(s).distance_m(b.node_pos(n));
    b.add_directed_edge(s, n, len * 1.4);

    Ok(District { network: b.build()?, grid })
}

/// Square of half-width `half_deg` around `centre`.
pub fn square_around(centre: GeoPoint, half_deg: f64) -> Vec<GeoPoint> {
    vec![
        GeoPoint::new(centre.lat - half_deg, centre.lon - half_deg),
        GeoPoint::new(centre.lat - half_deg, centre.lon + half_deg),
        GeoPoint::new(centre.lat + half_deg, centre.lon + half_deg),
        GeoPoint::new(centre.lat + half_deg, centre.lon - half_deg),
    ]
}
