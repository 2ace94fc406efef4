//! GOES-R geostationary projection.
//!
//! Scan angles are radians from the satellite nadir. Formulas follow the
//! GOES-R Product Definition and Users' Guide (PUG) Volume 4, section 4.2.8.

/// Projection parameters from the `goes_imager_projection` variable.
#[derive(Debug, Clone, PartialEq)]
pub struct GoesProjection {
    /// Satellite height above the ellipsoid (meters).
    pub perspective_point_height: f64,
    /// Semi-major axis of the Earth ellipsoid (meters).
    pub semi_major_axis: f64,
    /// Semi-minor axis of the Earth ellipsoid (meters).
    pub semi_minor_axis: f64,
    /// Longitude of the satellite nadir point (degrees).
    pub longitude_origin: f64,
}

impl Default for GoesProjection {
    fn default() -> Self {
        // GOES-East nominal values.
        Self {
            perspective_point_height: 35_786_023.0,
            semi_major_axis: 6_378_137.0,
            semi_minor_axis: 6_356_752.31414,
            longitude_origin: -75.0,
        }
    }
}

impl GoesProjection {
    /// Convert scan angles (radians) to geographic lat/lon (degrees).
    ///
    /// Returns None when the scan angle points past the Earth's limb.
    pub fn to_geographic(&self, x_rad: f64, y_rad: f64) -> Option<(f64, f64)> {
        let h_total = self.perspective_point_height + self.semi_major_axis;
        let req = self.semi_major_axis;
        let rpol = self.semi_minor_axis;
        let lambda_0 = self.longitude_origin.to_radians();

        let (sin_x, cos_x) = x_rad.sin_cos();
        let (sin_y, cos_y) = y_rad.sin_cos();

        let a = sin_x.powi(2)
            + cos_x.powi(2) * (cos_y.powi(2) + (req / rpol).powi(2) * sin_y.powi(2));
        let b = -2.0 * h_total * cos_x * cos_y;
        let c = h_total.powi(2) - req.powi(2);

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None; // Points to space.
        }

        let rs = (-b - discriminant.sqrt()) / (2.0 * a);
        let sx = rs * cos_x * cos_y;
        let sy = -rs * sin_x;
        let sz = rs * cos_x * sin_y;

        let lat = ((req / rpol).powi(2) * sz / ((h_total - sx).powi(2) + sy.powi(2)).sqrt())
            .atan()
            .to_degrees();
        let lon = (lambda_0 - (sy / (h_total - sx)).atan()).to_degrees();
        Some((lat, lon))
    }

    /// Convert geographic lat/lon (degrees) to scan angles (radians).
    ///
    /// Returns None when the point is not visible from the satellite.
    pub fn from_geographic(&self, lat_deg: f64, lon_deg: f64) -> Option<(f64, f64)> {
        let h_total = self.perspective_point_height + self.semi_major_axis;
        let req = self.semi_major_axis;
        let rpol = self.semi_minor_axis;
        let lambda_0 = self.longitude_origin.to_radians();

        let lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();

        // Geocentric latitude on the ellipsoid.
        let phi_c = ((rpol / req).powi(2) * lat.tan()).atan();
        let e2 = 1.0 - (rpol / req).powi(2);
        let rc = rpol / (1.0 - e2 * phi_c.cos().powi(2)).sqrt();

        let sx = h_total - rc * phi_c.cos() * (lon - lambda_0).cos();
        let sy = -rc * phi_c.cos() * (lon - lambda_0).sin();
        let sz = rc * phi_c.sin();

        // Visibility check: the point must be on the near side of the Earth.
        if h_total * (h_total - sx) < sy.powi(2) + (req / rpol).powi(2) * sz.powi(2) {
            return None;
        }

        let x = (-sy / (sx.powi(2) + sy.powi(2) + sz.powi(2)).sqrt()).asin();
        let y = (sz / sx).atan();
        Some((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nadir_round_trips_to_origin() {
        let proj = GoesProjection::default();
        let (lat, lon) = proj.to_geographic(0.0, 0.0).unwrap();
        assert!(lat.abs() < 1e-6);
        assert!((lon - proj.longitude_origin).abs() < 1e-6);
    }

    #[test]
    fn test_forward_inverse_round_trip() {
        let proj = GoesProjection::default();
        for &(lat, lon) in &[(35.0, -97.5), (25.76, -80.19), (45.0, -93.0)] {
            let (x, y) = proj.from_geographic(lat, lon).unwrap();
            let (lat2, lon2) = proj.to_geographic(x, y).unwrap();
            assert!((lat - lat2).abs() < 1e-3, "lat {lat} -> {lat2}");
            assert!((lon - lon2).abs() < 1e-3, "lon {lon} -> {lon2}");
        }
    }

    #[test]
    fn test_limb_points_are_rejected() {
        let proj = GoesProjection::default();
        // Antipode of the nadir point is never visible.
        assert!(proj.from_geographic(0.0, 105.0).is_none());
        // Scan angle far past the limb points to space.
        assert!(proj.to_geographic(0.3, 0.0).is_none());
    }
}
